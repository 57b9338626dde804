use std::sync::Arc;

use crate::{error::AppResult, models::CandidateMovie, services::providers::CatalogProvider};

/// Free-text title search against the catalog.
///
/// Delegates to the configured CatalogProvider and drops results without a
/// poster, since a card with no artwork is not worth showing.
pub async fn search_titles(
    provider: Arc<dyn CatalogProvider>,
    query: &str,
) -> AppResult<Vec<CandidateMovie>> {
    let results = provider.search_by_title(query).await?;
    Ok(results
        .into_iter()
        .filter(|movie| movie.poster_path.is_some())
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::services::providers::MockCatalogProvider;

    use super::*;

    fn movie(id: u64, poster: bool) -> CandidateMovie {
        CandidateMovie {
            id,
            title: format!("Movie {id}"),
            overview: "Synopsis.".to_string(),
            poster_path: poster.then(|| "/p.jpg".to_string()),
            release_date: "2011-09-09".to_string(),
            genre_ids: vec![18],
            vote_average: Some(7.2),
            vote_count: Some(900),
            adult: false,
            origin_country: Vec::new(),
            original_language: None,
            recommendation_reason: None,
        }
    }

    #[tokio::test]
    async fn search_drops_results_without_posters() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_by_title()
            .returning(|_| Ok(vec![movie(1, true), movie(2, false), movie(3, true)]));

        let results = search_titles(Arc::new(provider), "heat").await.unwrap();

        let ids: Vec<u64> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn search_propagates_provider_errors() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_by_title()
            .returning(|_| Err(crate::error::AppError::InvalidInput("Search query cannot be empty".to_string())));

        let result = search_titles(Arc::new(provider), "").await;

        assert!(result.is_err());
    }
}
