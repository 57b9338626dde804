/// Read-through caching for catalog lookups.
///
/// Checks the cache for `$key` and returns the hit if present; otherwise
/// awaits `$fetch`, stores the result with the given TTL via the background
/// writer, and returns it. Cache read errors propagate; callers decide
/// whether a broken cache should fail the lookup.
///
/// # Example
/// ```rust,ignore
/// let credits = cached!(cache, CacheKey::Credits(movie_id), CREDITS_TTL, async {
///     fetch_credits(movie_id).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        match $cache.get_from_cache(&$key).await? {
            Some(hit) => Ok(hit),
            None => {
                let fresh = $fetch.await?;
                $cache.set_in_background(&$key, &fresh, $ttl);
                Ok(fresh)
            }
        }
    }};
}
