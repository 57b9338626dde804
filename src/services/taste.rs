use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Disposition, Interaction};

/// Genres scoring at or below this are actively avoided in discovery queries.
pub const HATED_GENRE_CUTOFF: i32 = -5;

/// Builds the genre affinity profile from the interaction history.
///
/// Each rated or watchlisted film contributes a signed weight to every genre
/// attached to it. The weight decays with the age of the interaction: under
/// 30 days it counts 1.5x, over 90 days only 0.5x. Fractional weights are
/// truncated toward zero when accumulated.
///
/// A watchlisted film with no rating counts as mild positive interest; an
/// explicit rating always wins over watchlist membership.
pub fn compute_genre_scores(
    interactions: &[Interaction],
    now: DateTime<Utc>,
) -> HashMap<u32, i32> {
    let mut scores: HashMap<u32, i32> = HashMap::new();

    for interaction in interactions {
        let base: f64 = match interaction.disposition {
            Some(Disposition::Liked) => 5.0,
            Some(Disposition::Disliked) => -5.0,
            Some(Disposition::Ignored) => -3.0,
            _ if interaction.to_watch => 3.0,
            Some(Disposition::Neutral) => 0.5,
            None => continue,
        };

        let days = (now - interaction.updated_at).num_days();
        let recency = if days < 30 {
            1.5
        } else if days > 90 {
            0.5
        } else {
            1.0
        };
        let weight = base * recency;

        for genre_id in &interaction.genre_ids {
            *scores.entry(*genre_id).or_insert(0) += weight as i32;
        }
    }

    scores
}

/// The user's best-loved genres, strongest first. Only strictly positive
/// scores qualify; ties break toward the smaller genre id so the ranking is
/// stable across runs.
pub fn top_genres(scores: &HashMap<u32, i32>, count: usize) -> Vec<u32> {
    let mut ranked: Vec<(u32, i32)> = scores
        .iter()
        .filter(|(_, score)| **score > 0)
        .map(|(genre, score)| (*genre, *score))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(count).map(|(genre, _)| genre).collect()
}

/// Genres the user has consistently pushed away, in ascending id order.
pub fn hated_genres(scores: &HashMap<u32, i32>) -> Vec<u32> {
    let mut hated: Vec<u32> = scores
        .iter()
        .filter(|(_, score)| **score <= HATED_GENRE_CUTOFF)
        .map(|(genre, _)| *genre)
        .collect();
    hated.sort_unstable();
    hated
}
