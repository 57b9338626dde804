use std::collections::HashSet;

use chrono::Utc;

use crate::db::InteractionStore;
use crate::error::AppResult;
use crate::models::{CandidateMovie, Disposition, Interaction, RatingAction};

/// Seen-movie count at which the cold-start phase ends.
pub const ONBOARDING_SEEN_THRESHOLD: usize = 10;

/// Applies one rating gesture, creating the record on first contact.
///
/// Every action stamps `updated_at` and replaces the disposition wholesale;
/// like/dislike/neutral additionally mark the film watched and pull it off
/// the watchlist.
pub async fn apply_rating(
    store: &dyn InteractionStore,
    movie: &CandidateMovie,
    action: RatingAction,
) -> AppResult<Interaction> {
    let now = Utc::now();
    let mut record = match store.get(movie.id).await? {
        Some(existing) => existing,
        None => Interaction::from_candidate(movie, now),
    };
    record.updated_at = now;
    record.disposition = None;

    match action {
        RatingAction::Like => {
            record.disposition = Some(Disposition::Liked);
            record.watched = true;
            record.to_watch = false;
        }
        RatingAction::Dislike => {
            record.disposition = Some(Disposition::Disliked);
            record.watched = true;
            record.to_watch = false;
        }
        RatingAction::Neutral => {
            record.disposition = Some(Disposition::Neutral);
            record.watched = true;
            record.to_watch = false;
        }
        RatingAction::NotInterested => {
            record.disposition = Some(Disposition::Ignored);
            record.watched = false;
            record.to_watch = false;
        }
        RatingAction::AddToWatch => {
            record.to_watch = true;
        }
        RatingAction::Watched => {
            record.watched = true;
            record.to_watch = false;
        }
    }

    store.upsert(&record).await?;

    tracing::info!(
        movie_id = movie.id,
        action = ?action,
        "Interaction recorded"
    );

    Ok(record)
}

/// Clears the rating and the watched mark while keeping watchlist
/// membership. Returns `None` when the movie was never interacted with.
pub async fn undo_rating(
    store: &dyn InteractionStore,
    movie_id: u64,
) -> AppResult<Option<Interaction>> {
    let Some(mut record) = store.get(movie_id).await? else {
        return Ok(None);
    };

    record.disposition = None;
    record.watched = false;
    record.updated_at = Utc::now();
    store.upsert(&record).await?;

    Ok(Some(record))
}

/// Drops a film from the watchlist without touching anything else.
pub async fn remove_from_watchlist(
    store: &dyn InteractionStore,
    movie_id: u64,
) -> AppResult<Option<Interaction>> {
    let Some(mut record) = store.get(movie_id).await? else {
        return Ok(None);
    };

    record.to_watch = false;
    record.updated_at = Utc::now();
    store.upsert(&record).await?;

    Ok(Some(record))
}

/// Wipes the entire interaction history.
pub async fn reset_all(store: &dyn InteractionStore) -> AppResult<()> {
    store.delete_all().await?;
    tracing::info!("Interaction history cleared");
    Ok(())
}

// Derived views. All take the already-loaded history so one store read can
// feed a whole refresh.

/// Ids the user has rated or watched.
pub fn seen_ids(interactions: &[Interaction]) -> HashSet<u64> {
    interactions
        .iter()
        .filter(|record| record.is_seen())
        .map(|record| record.movie_id)
        .collect()
}

/// Watchlisted films, most recently touched first.
pub fn watchlist(interactions: &[Interaction]) -> Vec<&Interaction> {
    interactions
        .iter()
        .filter(|record| record.to_watch)
        .collect()
}

/// Liked films, most recently touched first.
pub fn recent_likes(interactions: &[Interaction]) -> Vec<&Interaction> {
    interactions
        .iter()
        .filter(|record| record.is_liked())
        .collect()
}

/// Everything a recommendation deck must never show again: seen films plus
/// the watchlist.
pub fn exclusion_ids(interactions: &[Interaction]) -> HashSet<u64> {
    interactions
        .iter()
        .filter(|record| record.is_seen() || record.to_watch)
        .map(|record| record.movie_id)
        .collect()
}

pub fn seen_count(interactions: &[Interaction]) -> usize {
    seen_ids(interactions).len()
}

pub fn onboarding_complete(interactions: &[Interaction]) -> bool {
    seen_count(interactions) >= ONBOARDING_SEEN_THRESHOLD
}
