use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{CandidateMovie, DiscoverQuery, FailureKind, RefreshOutcome, SortOrder};
use crate::services::filtering::CandidateFilter;
use crate::services::merging::merge_unique;
use crate::services::providers::{run_discover_batch, tolerate_failures, CatalogProvider};
use crate::services::random::RandomSource;

/// Stock tags for blind-box cards; one is drawn per film.
const INSPIRATION_REASONS: &[&str] = &[
    "Inspiration pick",
    "Blind-box surprise",
    "Worth a try",
    "Just press play",
];

/// Deals a blind-box batch: three wide randomized pools spanning acclaimed,
/// popular, and long-tail films, shuffled together.
///
/// The excluded set carries everything the user has seen or watchlisted plus
/// whatever deck the caller is already showing, so repeat deals keep digging
/// deeper. Posters are not required here; surprise beats polish.
pub async fn inspiration_batch(
    provider: Arc<dyn CatalogProvider>,
    filter: &CandidateFilter,
    rng: &RandomSource,
    excluded: &HashSet<u64>,
) -> RefreshOutcome {
    let queries = vec![
        DiscoverQuery {
            sort: SortOrder::RatingDesc,
            min_vote_count: Some(500),
            page: rng.in_range(1..=20),
            ..Default::default()
        },
        DiscoverQuery {
            page: rng.in_range(1..=10),
            ..Default::default()
        },
        DiscoverQuery {
            sort: SortOrder::RatingDesc,
            min_vote_count: Some(100),
            page: rng.in_range(1..=30),
            ..Default::default()
        },
    ];

    let outcomes = run_discover_batch(provider, queries).await;
    let mut pool: Vec<CandidateMovie> = tolerate_failures(outcomes).into_iter().flatten().collect();
    rng.shuffle(&mut pool);

    let eligible: Vec<CandidateMovie> = pool
        .into_iter()
        .filter(|movie| filter.is_eligible(movie, false, false, excluded))
        .collect();

    let deck: Vec<CandidateMovie> = merge_unique(vec![eligible])
        .into_iter()
        .map(|movie| {
            let reason = rng
                .choose(INSPIRATION_REASONS)
                .copied()
                .unwrap_or("Inspiration pick");
            movie.with_reason(reason)
        })
        .collect();

    if deck.is_empty() {
        return RefreshOutcome::Failed {
            kind: FailureKind::NoResults,
            message: "The blind box came up empty".to_string(),
        };
    }

    tracing::info!(deck = deck.len(), "Inspiration deck built");
    RefreshOutcome::Ready { items: deck }
}
