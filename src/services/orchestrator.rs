use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinError;

use crate::db::InteractionStore;
use crate::error::AppResult;
use crate::models::{
    language_name, shorten_title, CandidateMovie, CategoryItem, DiscoverQuery, FailureKind,
    Interaction, RefreshOutcome, SortOrder,
};
use crate::services::filtering::CandidateFilter;
use crate::services::interactions as history;
use crate::services::merging::{append_new, merge_unique};
use crate::services::planner::plan_queries;
use crate::services::providers::{
    all_failed, run_discover_batch, tolerate_failures, CatalogProvider,
};
use crate::services::random::RandomSource;

/// Languages the world-mix slot samples from.
const WORLD_LANGUAGES: &[&str] = &[
    "ja", "ko", "fr", "de", "it", "es", "th", "hi", "pt", "da", "sv", "fa", "ru", "nl", "pl",
];

/// A reset deck starts with at most this many cards.
const RESET_BATCH_SIZE: usize = 15;

/// Where a session currently is in the refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Merging,
    Ready,
    Failed,
}

/// Randomness for one smart refresh, drawn up front in a fixed order.
///
/// Drawing everything before the fan-out keeps seeded runs reproducible no
/// matter which slot task finishes first. Draw order: seed pick, person seed
/// pick, director coin, favorite page, world languages, world pages, regional
/// page.
struct SlotPlan {
    seed: Option<(u64, String)>,
    person_seed: Option<u64>,
    use_director: bool,
    favorite_page: u32,
    world_picks: Vec<(&'static str, u32)>,
    regional_page: u32,
}

/// Holds one user's live recommendation state: the current deck, the selected
/// category, and the in-flight refresh bookkeeping.
///
/// Concurrent refreshes are resolved by generation counting: each call takes
/// a fresh generation number, and only the call holding the newest number may
/// write its results back. Overtaken calls report `Superseded` and leave the
/// deck alone.
pub struct RecommendationSession {
    provider: Arc<dyn CatalogProvider>,
    store: Arc<dyn InteractionStore>,
    filter: CandidateFilter,
    rng: RandomSource,
    selected_category: RwLock<Option<CategoryItem>>,
    batch: RwLock<Vec<CandidateMovie>>,
    generation: AtomicU64,
    phase: RwLock<Phase>,
}

impl RecommendationSession {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn InteractionStore>,
        rng: RandomSource,
    ) -> Self {
        Self {
            provider,
            store,
            filter: CandidateFilter::new(),
            rng,
            selected_category: RwLock::new(None),
            batch: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            phase: RwLock::new(Phase::Idle),
        }
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub async fn selected_category(&self) -> Option<CategoryItem> {
        *self.selected_category.read().await
    }

    /// Snapshot of the current deck.
    pub async fn current_batch(&self) -> Vec<CandidateMovie> {
        self.batch.read().await.clone()
    }

    /// Drops a card from the deck, typically right after it was rated.
    pub async fn remove_from_batch(&self, movie_id: u64) {
        self.batch.write().await.retain(|movie| movie.id != movie_id);
    }

    /// Rebuilds (reset) or extends the deck for the current selection.
    pub async fn refresh(&self, reset: bool) -> AppResult<RefreshOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(generation, Phase::Fetching).await;
        if reset {
            self.batch.write().await.clear();
        }

        let category = *self.selected_category.read().await;
        let interactions = self.store.get_all().await?;
        let now = Utc::now();

        let lists = match &category {
            Some(item) => match self.run_category(item, now).await {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::warn!(error = %e, category = item.id, "Category fetch failed");
                    if reset {
                        self.set_phase(generation, Phase::Failed).await;
                        return Ok(RefreshOutcome::Failed {
                            kind: FailureKind::Network,
                            message: "Could not reach the catalog for this category".to_string(),
                        });
                    }
                    return Ok(RefreshOutcome::Ready {
                        items: self.current_batch().await,
                    });
                }
            },
            None => self.run_smart(&interactions, now).await,
        };

        self.set_phase(generation, Phase::Merging).await;

        let upcoming = category.map(|item| item.is_upcoming()).unwrap_or(false);
        let excluded = history::exclusion_ids(&interactions);

        let filtered: Vec<Vec<CandidateMovie>> = lists
            .into_iter()
            .map(|list| {
                list.into_iter()
                    .filter(|movie| self.filter.is_eligible(movie, upcoming, true, &excluded))
                    .collect()
            })
            .collect();
        let mut pool = merge_unique(filtered);

        // Upcoming keeps the catalog's release ordering; everything else gets
        // shuffled so two refreshes never deal the same deck.
        if !upcoming {
            self.rng.shuffle(&mut pool);
        }

        let applied = {
            let mut batch = self.batch.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::info!(generation, "Refresh superseded; discarding results");
                return Ok(RefreshOutcome::Superseded);
            }
            if reset {
                pool.truncate(RESET_BATCH_SIZE);
                *batch = pool;
            } else {
                let current = std::mem::take(&mut *batch);
                *batch = append_new(current, pool);
            }
            batch.clone()
        };

        if reset && applied.is_empty() {
            let (kind, message) = match &category {
                Some(item) => (
                    FailureKind::CategoryExhausted,
                    format!("No more films in {} right now", item.name),
                ),
                None => (
                    FailureKind::NoResults,
                    "No recommendations survived filtering".to_string(),
                ),
            };
            self.set_phase(generation, Phase::Failed).await;
            return Ok(RefreshOutcome::Failed { kind, message });
        }

        tracing::info!(
            generation,
            deck = applied.len(),
            category = category.map(|item| item.id).unwrap_or("smart"),
            "Deck refreshed"
        );

        self.set_phase(generation, Phase::Ready).await;
        Ok(RefreshOutcome::Ready { items: applied })
    }

    /// Extends the current deck without clearing it.
    pub async fn load_more(&self) -> AppResult<RefreshOutcome> {
        self.refresh(false).await
    }

    /// Switches category (None = smart mode) and rebuilds when the selection
    /// actually changed.
    pub async fn change_category(
        &self,
        category: Option<CategoryItem>,
    ) -> AppResult<RefreshOutcome> {
        let changed = {
            let mut selected = self.selected_category.write().await;
            if *selected != category {
                *selected = category;
                true
            } else {
                false
            }
        };

        if changed {
            self.refresh(true).await
        } else {
            Ok(RefreshOutcome::Ready {
                items: self.current_batch().await,
            })
        }
    }

    /// Orders the category menu: pinned entries first in table order, the
    /// rest by descending affinity for their sort genre. The sort is stable,
    /// so unscored categories keep their curated order.
    pub async fn category_menu(&self, items: &[CategoryItem]) -> AppResult<Vec<CategoryItem>> {
        let interactions = self.store.get_all().await?;
        let scores = crate::services::taste::compute_genre_scores(&interactions, Utc::now());

        let mut ordered = items.to_vec();
        ordered.sort_by(|a, b| match (a.is_pinned(), b.is_pinned()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => {
                let score_a = scores.get(&a.sort_genre_id).copied().unwrap_or(0);
                let score_b = scores.get(&b.sort_genre_id).copied().unwrap_or(0);
                score_b.cmp(&score_a)
            }
        });
        Ok(ordered)
    }

    /// Cold-start deck for users with no taste profile yet.
    pub async fn onboarding_batch(&self) -> RefreshOutcome {
        crate::services::onboarding::onboarding_batch(
            Arc::clone(&self.provider),
            &self.filter,
            &self.rng,
        )
        .await
    }

    /// Blind-box deck: wide random sampling, excluding everything the user
    /// has seen or watchlisted plus whatever the caller is already showing.
    pub async fn inspiration_batch(
        &self,
        already_dealt: &HashSet<u64>,
    ) -> AppResult<RefreshOutcome> {
        let interactions = self.store.get_all().await?;
        let mut excluded = history::exclusion_ids(&interactions);
        excluded.extend(already_dealt.iter().copied());

        Ok(crate::services::inspiration::inspiration_batch(
            Arc::clone(&self.provider),
            &self.filter,
            &self.rng,
            &excluded,
        )
        .await)
    }

    async fn set_phase(&self, generation: u64, phase: Phase) {
        // A newer refresh owns the phase now; stale callers must not touch it.
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        *self.phase.write().await = phase;
    }

    /// Category mode: run the planned queries concurrently. A total failure
    /// is reported as an error so the caller can surface a network problem;
    /// partial failures degrade to empty contributions.
    async fn run_category(
        &self,
        category: &CategoryItem,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Vec<CandidateMovie>>> {
        let queries = plan_queries(category, now, &self.rng);
        let outcomes = run_discover_batch(Arc::clone(&self.provider), queries).await;

        if all_failed(&outcomes) {
            return Err(crate::error::AppError::Catalog(format!(
                "every discovery query failed for category {}",
                category.id
            )));
        }

        let lists = tolerate_failures(outcomes);
        let tagged = lists
            .into_iter()
            .map(|list| {
                list.into_iter()
                    .map(|movie| movie.with_reason(category.name))
                    .collect()
            })
            .collect();
        Ok(tagged)
    }

    /// Smart mode: five concurrent slots, buffered per slot and concatenated
    /// in priority order (favorite genre, similar, person, regional, world).
    async fn run_smart(
        &self,
        interactions: &[Interaction],
        now: DateTime<Utc>,
    ) -> Vec<Vec<CandidateMovie>> {
        let scores = crate::services::taste::compute_genre_scores(interactions, now);
        let hated = crate::services::taste::hated_genres(&scores);
        let top = crate::services::taste::top_genres(&scores, 3);
        let favorite_genre = top.first().copied();

        let recent_likes = history::recent_likes(interactions);
        let watchlist = history::watchlist(interactions);
        let seen_count = history::seen_count(interactions);

        let plan = self.draw_slot_plan(&recent_likes, &watchlist, seen_count);

        // The similar-slot reason wants the seed's current display title; the
        // stored snapshot does as a fallback when the lookup fails.
        let similar_reason = match &plan.seed {
            Some((seed_id, stored_title)) => {
                let title = match self.provider.details(*seed_id).await {
                    Ok(fresh) => fresh.short_title(),
                    Err(e) => {
                        tracing::debug!(
                            error = %e,
                            movie_id = seed_id,
                            "Seed title lookup failed; using stored title"
                        );
                        shorten_title(stored_title)
                    }
                };
                Some(format!("Similar to {}", title))
            }
            None => None,
        };

        let seed_id = plan.seed.as_ref().map(|(id, _)| *id);

        let similar_task = tokio::spawn(similar_slot(
            Arc::clone(&self.provider),
            seed_id,
            similar_reason,
        ));
        let person_task = tokio::spawn(person_slot(
            Arc::clone(&self.provider),
            plan.person_seed,
            plan.use_director,
            favorite_genre,
            hated.clone(),
        ));
        let favorite_task = tokio::spawn(favorite_genre_slot(
            Arc::clone(&self.provider),
            favorite_genre,
            hated.clone(),
            plan.favorite_page,
        ));
        let regional_task = tokio::spawn(regional_slot(
            Arc::clone(&self.provider),
            hated.clone(),
            plan.regional_page,
        ));
        let world_task = tokio::spawn(world_mix_slot(
            Arc::clone(&self.provider),
            plan.world_picks,
            hated,
        ));

        let (similar, person, favorite, regional, world) = tokio::join!(
            similar_task,
            person_task,
            favorite_task,
            regional_task,
            world_task
        );

        let similar = join_slot(similar, "similar");
        let person = join_slot(person, "person");
        let favorite = join_slot(favorite, "favorite_genre");
        let regional = join_slot(regional, "regional");
        let mut world = join_slot(world, "world_mix");
        self.rng.shuffle(&mut world);

        tracing::debug!(
            favorite = favorite.len(),
            similar = similar.len(),
            person = person.len(),
            regional = regional.len(),
            world = world.len(),
            "Smart slots returned"
        );

        vec![favorite, similar, person, regional, world]
    }

    fn draw_slot_plan(
        &self,
        recent_likes: &[&Interaction],
        watchlist: &[&Interaction],
        seen_count: usize,
    ) -> SlotPlan {
        let seed_pool = &recent_likes[..recent_likes.len().min(5)];
        let seed = self
            .rng
            .choose(seed_pool)
            .map(|record| (record.movie_id, record.title.clone()));

        let person_pool: Vec<u64> = recent_likes
            .iter()
            .take(5)
            .chain(watchlist.iter().take(5))
            .map(|record| record.movie_id)
            .collect();
        let person_seed = self.rng.choose(&person_pool).copied();
        let use_director = self.rng.coin();

        // Page window widens as the user burns through the catalog.
        let estimated_page = (seen_count / 20) + 1;
        let upper = (estimated_page + 2).max(3) as u32;
        let favorite_page = self.rng.in_range(1..=upper);

        let languages = self.rng.sample(WORLD_LANGUAGES, 5);
        let world_picks = languages
            .into_iter()
            .map(|language| (language, self.rng.in_range(1..=2)))
            .collect();

        let regional_page = self.rng.in_range(1..=5);

        SlotPlan {
            seed,
            person_seed,
            use_director,
            favorite_page,
            world_picks,
            regional_page,
        }
    }
}

fn join_slot(
    result: Result<Vec<CandidateMovie>, JoinError>,
    slot: &'static str,
) -> Vec<CandidateMovie> {
    match result {
        Ok(movies) => movies,
        Err(e) => {
            tracing::warn!(error = %e, slot, "Slot task aborted; contributing nothing");
            Vec::new()
        }
    }
}

/// Top two films similar to the most recent like.
async fn similar_slot(
    provider: Arc<dyn CatalogProvider>,
    seed: Option<u64>,
    reason: Option<String>,
) -> Vec<CandidateMovie> {
    let (Some(movie_id), Some(reason)) = (seed, reason) else {
        return Vec::new();
    };

    match provider.similar(movie_id).await {
        Ok(similar) => similar
            .into_iter()
            .take(2)
            .map(|movie| movie.with_reason(reason.clone()))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, movie_id, slot = "similar", "Slot fetch failed");
            Vec::new()
        }
    }
}

/// Two films from the filmography of a director or lead actor pulled out of
/// the seed movie's credits.
async fn person_slot(
    provider: Arc<dyn CatalogProvider>,
    seed: Option<u64>,
    use_director: bool,
    favorite_genre: Option<u32>,
    hated: Vec<u32>,
) -> Vec<CandidateMovie> {
    let Some(movie_id) = seed else {
        return Vec::new();
    };

    let credits = match provider.credits(movie_id).await {
        Ok(credits) => credits,
        Err(e) => {
            tracing::warn!(error = %e, movie_id, slot = "person", "Credits fetch failed");
            return Vec::new();
        }
    };

    let person = if use_director {
        credits
            .director()
            .map(|member| (member.id, member.name.clone()))
            .or_else(|| {
                credits
                    .lead_actor()
                    .map(|member| (member.id, member.name.clone()))
            })
    } else {
        credits
            .lead_actor()
            .map(|member| (member.id, member.name.clone()))
    };
    let Some((person_id, person_name)) = person else {
        return Vec::new();
    };

    let query = DiscoverQuery {
        include_genres: favorite_genre.into_iter().collect(),
        exclude_genres: hated,
        with_people: vec![person_id],
        page: 1,
        ..Default::default()
    };

    match provider.discover(&query).await {
        Ok(movies) => movies
            .into_iter()
            .take(2)
            .map(|movie| movie.with_reason(format!("{} · style pick", person_name)))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, person_id, slot = "person", "Slot fetch failed");
            Vec::new()
        }
    }
}

/// Three highly-rated films from the favorite genre, each tagged by how it
/// earned its place.
async fn favorite_genre_slot(
    provider: Arc<dyn CatalogProvider>,
    favorite: Option<u32>,
    hated: Vec<u32>,
    page: u32,
) -> Vec<CandidateMovie> {
    let Some(genre) = favorite else {
        return Vec::new();
    };

    let query = DiscoverQuery {
        include_genres: vec![genre],
        exclude_genres: hated,
        sort: SortOrder::RatingDesc,
        min_vote_count: Some(1000),
        page,
        ..Default::default()
    };

    match provider.discover(&query).await {
        Ok(movies) => movies
            .into_iter()
            .take(3)
            .map(|movie| {
                let reason = match (movie.vote_average, movie.vote_count) {
                    (Some(score), _) if score >= 8.5 => "Acclaimed masterpiece",
                    (_, Some(votes)) if votes < 3000 => "Hidden gem",
                    _ => "Top pick",
                };
                movie.with_reason(reason)
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, genre, slot = "favorite_genre", "Slot fetch failed");
            Vec::new()
        }
    }
}

/// Three popular Chinese-language films.
async fn regional_slot(
    provider: Arc<dyn CatalogProvider>,
    hated: Vec<u32>,
    page: u32,
) -> Vec<CandidateMovie> {
    let query = DiscoverQuery {
        exclude_genres: hated,
        original_language: Some("zh".to_string()),
        page,
        ..Default::default()
    };

    match provider.discover(&query).await {
        Ok(movies) => movies
            .into_iter()
            .take(3)
            .map(|movie| movie.with_reason("Chinese-language hit"))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, slot = "regional", "Slot fetch failed");
            Vec::new()
        }
    }
}

/// Two top-rated films from each of the sampled languages, fetched
/// concurrently and concatenated in sample order.
async fn world_mix_slot(
    provider: Arc<dyn CatalogProvider>,
    picks: Vec<(&'static str, u32)>,
    hated: Vec<u32>,
) -> Vec<CandidateMovie> {
    let queries: Vec<DiscoverQuery> = picks
        .iter()
        .map(|(language, page)| DiscoverQuery {
            exclude_genres: hated.clone(),
            original_language: Some((*language).to_string()),
            min_vote_count: Some(300),
            page: *page,
            ..Default::default()
        })
        .collect();

    let outcomes = run_discover_batch(provider, queries).await;
    let lists = tolerate_failures(outcomes);

    picks
        .iter()
        .zip(lists)
        .flat_map(|((language, _), list)| {
            let reason = format!("Top rated · {}", language_name(language));
            list.into_iter()
                .take(2)
                .map(move |movie| movie.with_reason(reason.clone()))
        })
        .collect()
}
