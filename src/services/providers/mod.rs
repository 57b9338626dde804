use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{CandidateMovie, DiscoverQuery, MovieCredits};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Movie catalog backend.
///
/// One production implementation talks to TMDB; tests swap in mocks or
/// scripted providers. Implementations must be shareable across tasks since
/// the engine fans fetches out with `tokio::spawn`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Runs one discovery query and returns the candidate page.
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<CandidateMovie>>;

    /// Free-text title search.
    async fn search_by_title(&self, query: &str) -> AppResult<Vec<CandidateMovie>>;

    /// Cast and crew for a movie.
    async fn credits(&self, movie_id: u64) -> AppResult<MovieCredits>;

    /// Movies the catalog considers similar to the given one.
    async fn similar(&self, movie_id: u64) -> AppResult<Vec<CandidateMovie>>;

    /// Full record for a single movie.
    async fn details(&self, movie_id: u64) -> AppResult<CandidateMovie>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Runs every query concurrently and collects per-query outcomes in input
/// order, regardless of completion order.
pub async fn run_discover_batch(
    provider: Arc<dyn CatalogProvider>,
    queries: Vec<DiscoverQuery>,
) -> Vec<AppResult<Vec<CandidateMovie>>> {
    let mut tasks = Vec::with_capacity(queries.len());
    for query in queries {
        let provider = Arc::clone(&provider);
        tasks.push(tokio::spawn(
            async move { provider.discover(&query).await },
        ));
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "Discover task aborted before completing");
                outcomes.push(Err(crate::error::AppError::Internal(format!(
                    "discover task aborted: {e}"
                ))));
            }
        }
    }
    outcomes
}

/// Converts failed fetches into empty contributions so one bad query cannot
/// sink a whole batch. Failures are logged, not propagated.
pub fn tolerate_failures(
    outcomes: Vec<AppResult<Vec<CandidateMovie>>>,
) -> Vec<Vec<CandidateMovie>> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| match outcome {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, query_index = index, "Discover query failed; contributing nothing");
                Vec::new()
            }
        })
        .collect()
}

/// True when every query in a non-empty batch failed. Used to tell a dead
/// catalog apart from a merely thin one.
pub fn all_failed(outcomes: &[AppResult<Vec<CandidateMovie>>]) -> bool {
    !outcomes.is_empty() && outcomes.iter().all(|outcome| outcome.is_err())
}
