use std::collections::HashSet;

use crate::models::CandidateMovie;

/// Concatenates slot results in the order given and drops duplicate ids,
/// keeping the first occurrence. Slot priority therefore decides which
/// recommendation reason survives a collision.
pub fn merge_unique(lists: Vec<Vec<CandidateMovie>>) -> Vec<CandidateMovie> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for movie in list {
            if seen.insert(movie.id) {
                merged.push(movie);
            }
        }
    }

    merged
}

/// Appends only the truly new entries to an existing deck, preserving the
/// order of both halves.
pub fn append_new(
    existing: Vec<CandidateMovie>,
    incoming: Vec<CandidateMovie>,
) -> Vec<CandidateMovie> {
    let mut seen: HashSet<u64> = existing.iter().map(|movie| movie.id).collect();
    let mut combined = existing;

    for movie in incoming {
        if seen.insert(movie.id) {
            combined.push(movie);
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, reason: &str) -> CandidateMovie {
        CandidateMovie {
            id,
            title: format!("Movie {id}"),
            overview: "Synopsis.".to_string(),
            poster_path: Some("/p.jpg".to_string()),
            release_date: "2023-01-01".to_string(),
            genre_ids: vec![18],
            vote_average: Some(7.0),
            vote_count: Some(500),
            adult: false,
            origin_country: Vec::new(),
            original_language: None,
            recommendation_reason: Some(reason.to_string()),
        }
    }

    #[test]
    fn first_occurrence_wins_across_lists() {
        let merged = merge_unique(vec![
            vec![movie(1, "similar"), movie(2, "similar")],
            vec![movie(2, "world"), movie(3, "world")],
        ]);

        assert_eq!(
            merged.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            merged[1].recommendation_reason.as_deref(),
            Some("similar"),
            "the higher-priority slot's reason survives"
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge_unique(vec![
            vec![movie(1, "a"), movie(2, "a")],
            vec![movie(1, "b")],
        ]);
        let twice = merge_unique(vec![once.clone()]);

        assert_eq!(
            once.iter().map(|m| m.id).collect::<Vec<_>>(),
            twice.iter().map(|m| m.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn append_keeps_existing_order_and_skips_known_ids() {
        let existing = vec![movie(5, "old"), movie(6, "old")];
        let incoming = vec![movie(6, "new"), movie(7, "new"), movie(7, "new")];

        let combined = append_new(existing, incoming);

        assert_eq!(
            combined.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![5, 6, 7]
        );
        assert_eq!(combined[1].recommendation_reason.as_deref(), Some("old"));
    }

    #[test]
    fn append_to_empty_deck_takes_everything_once() {
        let combined = append_new(Vec::new(), vec![movie(1, "x"), movie(1, "y")]);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].recommendation_reason.as_deref(), Some("x"));
    }
}
