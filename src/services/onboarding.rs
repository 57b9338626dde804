use std::sync::Arc;

use crate::models::{CandidateMovie, DiscoverQuery, FailureKind, RefreshOutcome, SortOrder};
use crate::services::filtering::CandidateFilter;
use crate::services::merging::merge_unique;
use crate::services::providers::{run_discover_batch, tolerate_failures, CatalogProvider};
use crate::services::random::RandomSource;

/// Upper bound on the starter deck.
pub const ONBOARDING_BATCH_CAP: usize = 50;

/// Builds the cold-start deck from three broad pools: all-time top rated,
/// currently popular, and Chinese-language top rated.
///
/// Runs before any taste profile exists, so nothing is excluded as seen and
/// posterless entries stay in. Each card is tagged with its own genre label
/// since there is no personal signal to cite yet.
pub async fn onboarding_batch(
    provider: Arc<dyn CatalogProvider>,
    filter: &CandidateFilter,
    rng: &RandomSource,
) -> RefreshOutcome {
    let queries = vec![
        DiscoverQuery {
            sort: SortOrder::RatingDesc,
            min_vote_count: Some(3000),
            page: 1,
            ..Default::default()
        },
        DiscoverQuery {
            min_vote_count: Some(1000),
            page: rng.in_range(1..=5),
            ..Default::default()
        },
        DiscoverQuery {
            original_language: Some("zh".to_string()),
            sort: SortOrder::RatingDesc,
            min_vote_count: Some(500),
            page: 1,
            ..Default::default()
        },
    ];

    let outcomes = run_discover_batch(provider, queries).await;
    let lists = tolerate_failures(outcomes);

    let valid: Vec<Vec<CandidateMovie>> = lists
        .into_iter()
        .map(|list| {
            list.into_iter()
                .filter(|movie| filter.is_valid(movie, false))
                .map(|movie| match movie.genre_summary() {
                    Some(label) => movie.with_reason(label),
                    None => movie,
                })
                .collect()
        })
        .collect();

    let mut deck = merge_unique(valid);
    rng.shuffle(&mut deck);
    deck.truncate(ONBOARDING_BATCH_CAP);

    if deck.is_empty() {
        return RefreshOutcome::Failed {
            kind: FailureKind::NoResults,
            message: "Could not load the starter deck".to_string(),
        };
    }

    tracing::info!(deck = deck.len(), "Onboarding deck built");
    RefreshOutcome::Ready { items: deck }
}
