use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connection pool for the interaction store. Sized small; every query the
/// service runs is a point read or a single-row upsert.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}
