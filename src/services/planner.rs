use chrono::{DateTime, Duration, Months, Utc};

use crate::models::{CategoryItem, CategorySelector, CustomList, DiscoverQuery, SortOrder};
use crate::services::random::RandomSource;

/// Keyword ids that drag the romance category into soft-core territory.
const BLOCKED_ROMANCE_KEYWORDS: &[u32] = &[190678, 9826, 156372, 246237, 175657];

/// Translates a browse category into the discovery queries that fill its
/// deck. Most categories map to a single query on a randomized page; a few
/// carry hand-tuned floors and exclusions.
pub fn plan_queries(
    category: &CategoryItem,
    now: DateTime<Utc>,
    rng: &RandomSource,
) -> Vec<DiscoverQuery> {
    match category.selector {
        CategorySelector::Custom(CustomList::Upcoming) => {
            let today = now.date_naive();
            let tomorrow = today + Duration::days(1);
            let horizon = today
                .checked_add_months(Months::new(6))
                .unwrap_or(tomorrow);

            vec![DiscoverQuery {
                release_after: Some(tomorrow),
                release_before: Some(horizon),
                page: rng.in_range(1..=2),
                ..Default::default()
            }]
        }
        CategorySelector::Custom(CustomList::Healing) => vec![
            DiscoverQuery {
                include_genres: vec![10751],
                exclude_genres: vec![27, 53, 80],
                sort: SortOrder::RatingDesc,
                min_vote_count: Some(100),
                page: rng.in_range(1..=3),
                ..Default::default()
            },
            // A second helping of music films, always from the front page.
            DiscoverQuery {
                include_genres: vec![10402],
                exclude_genres: vec![27, 53],
                sort: SortOrder::RatingDesc,
                min_vote_count: Some(100),
                page: 1,
                ..Default::default()
            },
        ],
        CategorySelector::Custom(CustomList::HiddenGems) => vec![DiscoverQuery {
            // Well rated but capped on votes, which is what makes them hidden.
            exclude_genres: vec![10770],
            sort: SortOrder::RatingDesc,
            min_vote_count: Some(100),
            max_vote_count: Some(2500),
            page: rng.in_range(1..=5),
            ..Default::default()
        }],
        CategorySelector::Genre(genre_id) => {
            let page = rng.in_range(1..=3);
            let query = match genre_id {
                // Romance, minus horror/thriller crossovers and adult keywords.
                10749 => DiscoverQuery {
                    include_genres: vec![genre_id],
                    exclude_genres: vec![27, 53],
                    without_keywords: BLOCKED_ROMANCE_KEYWORDS.to_vec(),
                    min_vote_count: Some(100),
                    page,
                    ..Default::default()
                },
                // Comedy that is not secretly a horror or crime film.
                35 => DiscoverQuery {
                    include_genres: vec![genre_id],
                    exclude_genres: vec![27, 53, 80],
                    page,
                    ..Default::default()
                },
                // Horror proper: no family tags, no animation, no TV movies.
                27 => DiscoverQuery {
                    include_genres: vec![genre_id],
                    exclude_genres: vec![10751, 16, 10770],
                    min_vote_count: Some(300),
                    page,
                    ..Default::default()
                },
                _ => DiscoverQuery {
                    include_genres: vec![genre_id],
                    page,
                    ..Default::default()
                },
            };
            vec![query]
        }
        CategorySelector::Keyword(keyword_id) => vec![DiscoverQuery {
            with_keywords: vec![keyword_id],
            page: rng.in_range(1..=3),
            ..Default::default()
        }],
        CategorySelector::Language(code) => vec![DiscoverQuery {
            original_language: Some(code.to_string()),
            page: rng.in_range(1..=3),
            ..Default::default()
        }],
    }
}
