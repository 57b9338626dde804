use std::collections::HashSet;

use crate::models::CandidateMovie;

/// Title substrings that mark concert recordings and adult content, matched
/// case-insensitively anywhere in the title.
const DEFAULT_BANNED_TITLE_TERMS: &[&str] = &[
    "演唱会", "巡演", "巡回", "live in", "concert", "tour", "sex", "erotic",
    "porn", "色情", "三级", "情色", "av", "nudity", "hentai", "xxx", "erotica",
];

/// TV-movie reruns never make good cards.
const DEFAULT_BANNED_GENRES: &[u32] = &[10770];

/// Quality and suitability rules applied to every fetched candidate before it
/// can reach a deck.
pub struct CandidateFilter {
    banned_genres: HashSet<u32>,
    banned_title_terms: Vec<String>,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::with_rules(
            DEFAULT_BANNED_GENRES.iter().copied().collect(),
            DEFAULT_BANNED_TITLE_TERMS
                .iter()
                .map(|term| term.to_string())
                .collect(),
        )
    }

    /// Filter with custom block lists. Terms are lowercased once here so the
    /// per-movie check stays a plain substring scan.
    pub fn with_rules(banned_genres: HashSet<u32>, banned_title_terms: Vec<String>) -> Self {
        let banned_title_terms = banned_title_terms
            .into_iter()
            .map(|term| term.to_lowercase())
            .collect();
        Self {
            banned_genres,
            banned_title_terms,
        }
    }

    /// Baseline quality gate.
    ///
    /// Upcoming decks accept anything with an overview that is not flagged
    /// adult; advance listings have too few votes for the score floors to be
    /// meaningful.
    pub fn is_valid(&self, movie: &CandidateMovie, upcoming: bool) -> bool {
        if movie.overview.trim().is_empty() {
            return false;
        }
        if movie.adult {
            return false;
        }
        if upcoming {
            return true;
        }

        if matches!(movie.vote_average, Some(score) if score < 4.0) {
            return false;
        }
        if matches!(movie.vote_count, Some(votes) if votes < 50) {
            return false;
        }
        if movie
            .genre_ids
            .iter()
            .any(|genre| self.banned_genres.contains(genre))
        {
            return false;
        }

        let title = movie.title.to_lowercase();
        !self
            .banned_title_terms
            .iter()
            .any(|term| title.contains(term))
    }

    /// Deck admission gate: valid, optionally carrying a poster, and not in
    /// the excluded id set (typically everything seen or watchlisted).
    pub fn is_eligible(
        &self,
        movie: &CandidateMovie,
        upcoming: bool,
        poster_required: bool,
        excluded: &HashSet<u64>,
    ) -> bool {
        if !self.is_valid(movie, upcoming) {
            return false;
        }
        if poster_required && movie.poster_path.is_none() {
            return false;
        }
        !excluded.contains(&movie.id)
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new()
    }
}
