use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::movie::CandidateMovie;

/// Mutually-exclusive rating state. A single enum field makes "at most one
/// of liked/disliked/neutral/ignored" a property of the type rather than a
/// runtime check over four booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Liked,
    Disliked,
    Neutral,
    Ignored,
}

impl Disposition {
    /// Storage representation; mirrors the serde wire names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Liked => "liked",
            Disposition::Disliked => "disliked",
            Disposition::Neutral => "neutral",
            Disposition::Ignored => "ignored",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "liked" => Some(Disposition::Liked),
            "disliked" => Some(Disposition::Disliked),
            "neutral" => Some(Disposition::Neutral),
            "ignored" => Some(Disposition::Ignored),
            _ => None,
        }
    }
}

/// A user's judgment on one movie. One record per movie id; re-rating
/// overwrites fields in place and refreshes `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub movie_id: u64,
    /// Display title snapshotted at interaction time.
    pub title: String,
    #[serde(default)]
    pub disposition: Option<Disposition>,
    /// On the watchlist. Independent of disposition.
    #[serde(default)]
    pub to_watch: bool,
    /// Marked watched. Independent of disposition; does not qualify the
    /// record for taste scoring on its own.
    #[serde(default)]
    pub watched: bool,
    /// Genre ids snapshotted at interaction time; scoring reads these, never
    /// a fresh catalog lookup.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Interaction {
    /// Fresh record for a movie with no judgment yet.
    pub fn from_candidate(movie: &CandidateMovie, now: DateTime<Utc>) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            disposition: None,
            to_watch: false,
            watched: false,
            genre_ids: movie.genre_ids.clone(),
            origin_country: movie.origin_country.first().cloned(),
            original_language: movie.original_language.clone(),
            updated_at: now,
        }
    }

    pub fn is_liked(&self) -> bool {
        self.disposition == Some(Disposition::Liked)
    }

    /// Seen = judged or watched. Drives both the onboarding threshold and
    /// the candidate exclusion set. Watchlist membership alone is not seen.
    pub fn is_seen(&self) -> bool {
        self.disposition.is_some() || self.watched
    }
}
