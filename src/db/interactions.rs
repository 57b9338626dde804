use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{Disposition, Interaction};

/// Persistence seam for the user's interaction history.
///
/// One record per movie id. `upsert` must be atomic per record; no
/// multi-record transactional guarantees are required (or relied on).
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Full history, most recently updated first.
    async fn get_all(&self) -> AppResult<Vec<Interaction>>;

    async fn get(&self, movie_id: u64) -> AppResult<Option<Interaction>>;

    /// Insert-or-update keyed by movie id.
    async fn upsert(&self, interaction: &Interaction) -> AppResult<()>;

    /// Wholesale reset of the taste history.
    async fn delete_all(&self) -> AppResult<()>;
}

/// Production store over PostgreSQL.
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_interaction(row: &PgRow) -> AppResult<Interaction> {
    let disposition: Option<String> = row.try_get("disposition")?;
    let genre_ids: Vec<i32> = row.try_get("genre_ids")?;

    Ok(Interaction {
        movie_id: row.try_get::<i64, _>("movie_id")? as u64,
        title: row.try_get("title")?,
        disposition: disposition.as_deref().and_then(Disposition::parse),
        to_watch: row.try_get("to_watch")?,
        watched: row.try_get("watched")?,
        genre_ids: genre_ids.into_iter().map(|id| id as u32).collect(),
        origin_country: row.try_get("origin_country")?,
        original_language: row.try_get("original_language")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn get_all(&self) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query(
            r#"
            SELECT movie_id, title, disposition, to_watch, watched,
                   genre_ids, origin_country, original_language, updated_at
            FROM interactions
            ORDER BY updated_at DESC, movie_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_interaction).collect()
    }

    async fn get(&self, movie_id: u64) -> AppResult<Option<Interaction>> {
        let row = sqlx::query(
            r#"
            SELECT movie_id, title, disposition, to_watch, watched,
                   genre_ids, origin_country, original_language, updated_at
            FROM interactions
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_interaction).transpose()
    }

    async fn upsert(&self, interaction: &Interaction) -> AppResult<()> {
        let genre_ids: Vec<i32> = interaction.genre_ids.iter().map(|&id| id as i32).collect();

        sqlx::query(
            r#"
            INSERT INTO interactions
                (movie_id, title, disposition, to_watch, watched,
                 genre_ids, origin_country, original_language, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (movie_id) DO UPDATE SET
                title = EXCLUDED.title,
                disposition = EXCLUDED.disposition,
                to_watch = EXCLUDED.to_watch,
                watched = EXCLUDED.watched,
                genre_ids = EXCLUDED.genre_ids,
                origin_country = EXCLUDED.origin_country,
                original_language = EXCLUDED.original_language,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(interaction.movie_id as i64)
        .bind(&interaction.title)
        .bind(interaction.disposition.map(|d| d.as_str()))
        .bind(interaction.to_watch)
        .bind(interaction.watched)
        .bind(&genre_ids)
        .bind(&interaction.origin_country)
        .bind(&interaction.original_language)
        .bind(interaction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM interactions")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory store for tests and local development without Postgres.
#[derive(Default)]
pub struct MemoryInteractionStore {
    records: RwLock<HashMap<u64, Interaction>>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn get_all(&self) -> AppResult<Vec<Interaction>> {
        let records = self.records.read().await;
        let mut all: Vec<Interaction> = records.values().cloned().collect();
        // HashMap iteration order is arbitrary; match the SQL ordering.
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(a.movie_id.cmp(&b.movie_id))
        });
        Ok(all)
    }

    async fn get(&self, movie_id: u64) -> AppResult<Option<Interaction>> {
        let records = self.records.read().await;
        Ok(records.get(&movie_id).cloned())
    }

    async fn upsert(&self, interaction: &Interaction) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.insert(interaction.movie_id, interaction.clone());
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.clear();
        Ok(())
    }
}
