pub mod category;
pub mod interaction;
pub mod movie;
pub mod query;

pub use category::{
    category_by_id, validate_categories, CategoryItem, CategorySelector, CustomList, CATEGORIES,
};
pub use interaction::{Disposition, Interaction};
pub use movie::{
    genre_name, language_name, shorten_title, CandidateMovie, CastMember, CatalogPage, CrewMember,
    MovieCredits,
};
pub use query::{DiscoverQuery, SortOrder};

use serde::{Deserialize, Serialize};

/// How a rating gesture maps onto an interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingAction {
    Like,
    Dislike,
    Neutral,
    NotInterested,
    AddToWatch,
    Watched,
}

/// Why a refresh produced no usable batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Nothing survived fetching and filtering on a reset.
    NoResults,
    /// A selected category has no further films to offer; benign.
    CategoryExhausted,
    /// The catalog could not be reached while rebuilding a category batch.
    Network,
}

/// Result of one refresh call.
///
/// `Superseded` means a newer refresh overtook this one mid-flight; its
/// results were discarded without touching the session batch and the caller
/// should ignore the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Ready { items: Vec<CandidateMovie> },
    Failed { kind: FailureKind, message: String },
    Superseded,
}

impl RefreshOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, RefreshOutcome::Ready { .. })
    }
}
