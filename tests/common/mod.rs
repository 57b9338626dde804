#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use reeltaste_api::error::{AppError, AppResult};
use reeltaste_api::models::{CandidateMovie, DiscoverQuery, MovieCredits};
use reeltaste_api::services::providers::CatalogProvider;

type DiscoverScript = dyn Fn(&DiscoverQuery) -> AppResult<Vec<CandidateMovie>> + Send + Sync;
type SimilarScript = dyn Fn(u64) -> AppResult<Vec<CandidateMovie>> + Send + Sync;
type CreditsScript = dyn Fn(u64) -> AppResult<MovieCredits> + Send + Sync;
type DetailsScript = dyn Fn(u64) -> AppResult<CandidateMovie> + Send + Sync;
type SearchScript = dyn Fn(&str) -> AppResult<Vec<CandidateMovie>> + Send + Sync;

/// Catalog stand-in driven by plain closures, usable from integration tests
/// where the mockall mocks are out of reach.
///
/// Defaults are benign: discovery, similar and search return nothing, credits
/// come back empty, details report not-found. Tests script only the endpoints
/// they care about.
pub struct ScriptedCatalog {
    discover: Box<DiscoverScript>,
    similar: Box<SimilarScript>,
    credits: Box<CreditsScript>,
    details: Box<DetailsScript>,
    search: Box<SearchScript>,
    slow_discover: Option<(Arc<AtomicBool>, Duration)>,
}

impl Default for ScriptedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self {
            discover: Box::new(|_| Ok(Vec::new())),
            similar: Box::new(|_| Ok(Vec::new())),
            credits: Box::new(|_| {
                Ok(MovieCredits {
                    cast: Vec::new(),
                    crew: Vec::new(),
                })
            }),
            details: Box::new(|movie_id| {
                Err(AppError::NotFound(format!("movie {movie_id}")))
            }),
            search: Box::new(|_| Ok(Vec::new())),
            slow_discover: None,
        }
    }

    pub fn on_discover<F>(mut self, script: F) -> Self
    where
        F: Fn(&DiscoverQuery) -> AppResult<Vec<CandidateMovie>> + Send + Sync + 'static,
    {
        self.discover = Box::new(script);
        self
    }

    pub fn on_similar<F>(mut self, script: F) -> Self
    where
        F: Fn(u64) -> AppResult<Vec<CandidateMovie>> + Send + Sync + 'static,
    {
        self.similar = Box::new(script);
        self
    }

    pub fn on_credits<F>(mut self, script: F) -> Self
    where
        F: Fn(u64) -> AppResult<MovieCredits> + Send + Sync + 'static,
    {
        self.credits = Box::new(script);
        self
    }

    pub fn on_details<F>(mut self, script: F) -> Self
    where
        F: Fn(u64) -> AppResult<CandidateMovie> + Send + Sync + 'static,
    {
        self.details = Box::new(script);
        self
    }

    pub fn on_search<F>(mut self, script: F) -> Self
    where
        F: Fn(&str) -> AppResult<Vec<CandidateMovie>> + Send + Sync + 'static,
    {
        self.search = Box::new(script);
        self
    }

    /// Stalls discover calls for `delay` while `flag` is set. Lets tests
    /// arrange one refresh overtaking another.
    pub fn with_slow_discover(mut self, flag: Arc<AtomicBool>, delay: Duration) -> Self {
        self.slow_discover = Some((flag, delay));
        self
    }
}

#[async_trait]
impl CatalogProvider for ScriptedCatalog {
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<CandidateMovie>> {
        if let Some((flag, delay)) = &self.slow_discover {
            if flag.load(Ordering::SeqCst) {
                tokio::time::sleep(*delay).await;
            }
        }
        (self.discover)(query)
    }

    async fn search_by_title(&self, query: &str) -> AppResult<Vec<CandidateMovie>> {
        (self.search)(query)
    }

    async fn credits(&self, movie_id: u64) -> AppResult<MovieCredits> {
        (self.credits)(movie_id)
    }

    async fn similar(&self, movie_id: u64) -> AppResult<Vec<CandidateMovie>> {
        (self.similar)(movie_id)
    }

    async fn details(&self, movie_id: u64) -> AppResult<CandidateMovie> {
        (self.details)(movie_id)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A film that clears every validity and eligibility rule.
pub fn movie(id: u64) -> CandidateMovie {
    CandidateMovie {
        id,
        title: format!("Film {id}"),
        overview: "A film worth watching.".to_string(),
        poster_path: Some(format!("/poster-{id}.jpg")),
        release_date: "2019-05-01".to_string(),
        genre_ids: vec![18],
        vote_average: Some(7.0),
        vote_count: Some(400),
        adult: false,
        origin_country: Vec::new(),
        original_language: None,
        recommendation_reason: None,
    }
}

pub fn movie_in_genre(id: u64, genre: u32) -> CandidateMovie {
    let mut film = movie(id);
    film.genre_ids = vec![genre];
    film
}

pub fn posterless(id: u64) -> CandidateMovie {
    let mut film = movie(id);
    film.poster_path = None;
    film
}
