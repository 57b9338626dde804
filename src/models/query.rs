use chrono::NaiveDate;

/// Sort key for catalog discover queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    RatingDesc,
}

impl SortOrder {
    /// Wire value understood by the catalog's discover endpoint.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::RatingDesc => "vote_average.desc",
        }
    }
}

/// One catalog discover query: a field-for-field mirror of the provider's
/// filter surface. `Default` is "most popular, page 1, no filters".
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub include_genres: Vec<u32>,
    pub exclude_genres: Vec<u32>,
    pub with_keywords: Vec<u32>,
    pub without_keywords: Vec<u32>,
    pub with_people: Vec<u64>,
    pub original_language: Option<String>,
    pub release_after: Option<NaiveDate>,
    pub release_before: Option<NaiveDate>,
    pub sort: SortOrder,
    pub min_vote_count: Option<u32>,
    pub max_vote_count: Option<u32>,
    /// 1-based page number.
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            include_genres: Vec::new(),
            exclude_genres: Vec::new(),
            with_keywords: Vec::new(),
            without_keywords: Vec::new(),
            with_people: Vec::new(),
            original_language: None,
            release_after: None,
            release_before: None,
            sort: SortOrder::PopularityDesc,
            min_vote_count: None,
            max_vote_count: None,
            page: 1,
        }
    }
}
