use serde::{Deserialize, Serialize};

/// A movie candidate as returned by the catalog's discover/search/similar
/// endpoints.
///
/// The numeric `id` is the unique key for deduplication. `recommendation_reason`
/// is attached by the engine during merging and never read back from the
/// catalog; it is cosmetic metadata, not part of catalog identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    // The single-movie details endpoint omits this list; default to empty.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<String>,
}

impl CandidateMovie {
    /// Returns self tagged with a recommendation reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.recommendation_reason = Some(reason.into());
        self
    }

    /// First two genre names joined with " / " (e.g. "Drama / Romance");
    /// `None` when no genre id resolves to a known name.
    pub fn genre_summary(&self) -> Option<String> {
        let names: Vec<&str> = self
            .genre_ids
            .iter()
            .filter_map(|&id| genre_name(id))
            .take(2)
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(" / "))
        }
    }

    /// Display-length title for reason tags.
    pub fn short_title(&self) -> String {
        shorten_title(&self.title)
    }
}

/// Cuts long titles at 18 characters with an ellipsis so reason tags stay
/// readable on a card.
pub fn shorten_title(title: &str) -> String {
    if title.chars().count() > 18 {
        let prefix: String = title.chars().take(18).collect();
        format!("{}...", prefix)
    } else {
        title.to_string()
    }
}

/// Paged envelope around the catalog's list endpoints; only the items matter.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<CandidateMovie>,
}

// ============================================================================
// Credits
// ============================================================================

/// Cast and crew for one movie, as returned by the catalog's credits endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub vote_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

impl MovieCredits {
    /// The credited director, when one exists.
    pub fn director(&self) -> Option<&CrewMember> {
        self.crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
    }

    /// Top-billed cast member.
    pub fn lead_actor(&self) -> Option<&CastMember> {
        self.cast.first()
    }
}

// ============================================================================
// Display labels
// ============================================================================

/// Catalog genre id → English display name.
pub fn genre_name(id: u32) -> Option<&'static str> {
    match id {
        28 => Some("Action"),
        12 => Some("Adventure"),
        16 => Some("Animation"),
        35 => Some("Comedy"),
        80 => Some("Crime"),
        99 => Some("Documentary"),
        18 => Some("Drama"),
        10751 => Some("Family"),
        14 => Some("Fantasy"),
        36 => Some("History"),
        27 => Some("Horror"),
        10402 => Some("Music"),
        9648 => Some("Mystery"),
        10749 => Some("Romance"),
        878 => Some("Science Fiction"),
        10770 => Some("TV Movie"),
        53 => Some("Thriller"),
        10752 => Some("War"),
        37 => Some("Western"),
        _ => None,
    }
}

/// Original-language code → English display name; unknown codes echo back.
pub fn language_name(code: &str) -> &str {
    match code {
        "ja" => "Japanese",
        "ko" => "Korean",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "es" => "Spanish",
        "th" => "Thai",
        "hi" => "Hindi",
        "pt" => "Portuguese",
        "da" => "Danish",
        "sv" => "Swedish",
        "fa" => "Persian",
        "ru" => "Russian",
        "nl" => "Dutch",
        "pl" => "Polish",
        "zh" => "Chinese",
        "cn" => "Cantonese",
        _ => code,
    }
}
