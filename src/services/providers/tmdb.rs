use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CandidateMovie, CatalogPage, DiscoverQuery, MovieCredits},
    services::providers::CatalogProvider,
};

const SEARCH_CACHE_TTL: u64 = 86400; // 1 day
const CREDITS_CACHE_TTL: u64 = 604800; // 1 week
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const SIMILAR_CACHE_TTL: u64 = 86400; // 1 day

/// TMDB-backed catalog provider.
///
/// Lookup endpoints (search, credits, similar, details) run through the Redis
/// read-through cache. Discovery stays uncached: its randomized pages are what
/// keep repeat visits fresh, and caching them would pin every user to the same
/// slice of the catalog.
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.catalog_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
            language: config.catalog_language.clone(),
            cache,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, endpoint);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!(
                "Catalog returned status {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

/// Serializes a discovery query into TMDB query-string pairs. Pair order is
/// fixed so logged request URLs stay comparable.
fn discover_params(query: &DiscoverQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("sort_by".to_string(), query.sort.as_param().to_string()),
        ("page".to_string(), query.page.to_string()),
        ("include_adult".to_string(), "false".to_string()),
        ("include_video".to_string(), "false".to_string()),
    ];

    if !query.include_genres.is_empty() {
        params.push(("with_genres".to_string(), join_ids(&query.include_genres)));
    }
    if !query.exclude_genres.is_empty() {
        params.push((
            "without_genres".to_string(),
            join_ids(&query.exclude_genres),
        ));
    }
    if !query.with_keywords.is_empty() {
        params.push(("with_keywords".to_string(), join_ids(&query.with_keywords)));
    }
    if !query.without_keywords.is_empty() {
        params.push((
            "without_keywords".to_string(),
            join_ids(&query.without_keywords),
        ));
    }
    if !query.with_people.is_empty() {
        params.push(("with_people".to_string(), join_ids(&query.with_people)));
    }
    if let Some(language) = &query.original_language {
        params.push(("with_original_language".to_string(), language.clone()));
    }
    if let Some(date) = query.release_after {
        params.push((
            "primary_release_date.gte".to_string(),
            date.format("%Y-%m-%d").to_string(),
        ));
    }
    if let Some(date) = query.release_before {
        params.push((
            "primary_release_date.lte".to_string(),
            date.format("%Y-%m-%d").to_string(),
        ));
    }
    if let Some(min) = query.min_vote_count {
        params.push(("vote_count.gte".to_string(), min.to_string()));
    }
    if let Some(max) = query.max_vote_count {
        params.push(("vote_count.lte".to_string(), max.to_string()));
    }

    params
}

fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<CandidateMovie>> {
        let params = discover_params(query);
        let page: CatalogPage = self.fetch("/discover/movie", &params).await?;

        tracing::debug!(
            results = page.results.len(),
            page = query.page,
            provider = "tmdb",
            "Discover query completed"
        );

        Ok(page.results)
    }

    async fn search_by_title(&self, query: &str) -> AppResult<Vec<CandidateMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::TitleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let params = vec![
                    ("query".to_string(), query.to_string()),
                    ("include_adult".to_string(), "false".to_string()),
                ];
                let page: CatalogPage = self.fetch("/search/movie", &params).await?;

                tracing::info!(
                    query = %query,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Title search completed"
                );

                Ok(page.results)
            }
        )
    }

    async fn credits(&self, movie_id: u64) -> AppResult<MovieCredits> {
        cached!(
            self.cache,
            CacheKey::Credits(movie_id),
            CREDITS_CACHE_TTL,
            async move {
                let credits: MovieCredits = self
                    .fetch(&format!("/movie/{}/credits", movie_id), &[])
                    .await?;

                tracing::info!(
                    movie_id,
                    cast = credits.cast.len(),
                    provider = "tmdb",
                    "Credits fetched"
                );

                Ok(credits)
            }
        )
    }

    async fn similar(&self, movie_id: u64) -> AppResult<Vec<CandidateMovie>> {
        cached!(
            self.cache,
            CacheKey::Similar(movie_id),
            SIMILAR_CACHE_TTL,
            async move {
                let page: CatalogPage = self
                    .fetch(&format!("/movie/{}/similar", movie_id), &[])
                    .await?;
                Ok(page.results)
            }
        )
    }

    async fn details(&self, movie_id: u64) -> AppResult<CandidateMovie> {
        cached!(
            self.cache,
            CacheKey::Details(movie_id),
            DETAILS_CACHE_TTL,
            async move { self.fetch(&format!("/movie/{}", movie_id), &[]).await }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
