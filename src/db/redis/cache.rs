use std::fmt::Display;

use redis::{AsyncCommands, Client};
use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};

/// Keys for the catalog response cache. Only stable lookups are cached;
/// discover queries are deliberately absent since their randomized pages
/// exist to vary repeated calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    TitleSearch(String),
    Credits(u64),
    Details(u64),
    Similar(u64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::TitleSearch(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Credits(movie_id) => write!(f, "credits:{}", movie_id),
            CacheKey::Details(movie_id) => write!(f, "details:{}", movie_id),
            CacheKey::Similar(movie_id) => write!(f, "similar:{}", movie_id),
        }
    }
}

/// Creates the Redis client behind the catalog cache.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A serialized value waiting to be written back to Redis.
struct PendingWrite {
    key: String,
    payload: String,
    ttl: u64,
}

/// Read-through cache over Redis. Reads are synchronous with the caller;
/// writes go through a background task so a slow Redis never delays a
/// catalog response.
#[derive(Clone)]
pub struct Cache {
    client: Client,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Handle for draining the write queue at shutdown.
pub struct CacheWriterHandle {
    stop: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop.
    pub async fn shutdown(self) {
        let _ = self.stop.send(()).await;
        tracing::info!("Cache writer asked to stop");
    }
}

impl Cache {
    /// Creates the cache and spawns its background write task.
    pub async fn new(client: Client) -> (Self, CacheWriterHandle) {
        let (writes, queue) = mpsc::unbounded_channel();
        let (stop, stop_rx) = mpsc::channel(1);

        tokio::spawn(writer_task(client.clone(), queue, stop_rx));

        (Self { client, writes }, CacheWriterHandle { stop })
    }

    /// Retrieves and deserializes a cached value; `None` on miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let hit: Option<String> = conn.get(key.to_string()).await?;

        hit.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Cache deserialization error: {e}")))
        })
        .transpose()
    }

    /// Serializes a value and hands it to the background writer; returns
    /// immediately without waiting for the Redis write.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            payload,
            ttl,
        };
        if self.writes.send(write).is_err() {
            tracing::error!("Cache writer is gone; dropping write");
        }
    }
}

/// Applies pending writes until the stop signal arrives, then flushes
/// whatever is still queued before exiting.
async fn writer_task(
    client: Client,
    mut queue: mpsc::UnboundedReceiver<PendingWrite>,
    mut stop: mpsc::Receiver<()>,
) {
    tracing::info!("Cache writer task started");

    loop {
        tokio::select! {
            Some(write) = queue.recv() => {
                if let Err(e) = persist(&client, write).await {
                    tracing::error!(error = %e, "Failed to write to Redis cache");
                }
            }
            _ = stop.recv() => {
                queue.close();
                let mut flushed = 0;
                while let Some(write) = queue.recv().await {
                    match persist(&client, write).await {
                        Ok(()) => flushed += 1,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown")
                        }
                    }
                }
                tracing::info!(flushed, "Cache writer task stopped");
                break;
            }
        }
    }
}

async fn persist(client: &Client, write: PendingWrite) -> AppResult<()> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: () = conn.set_ex(write.key, write.payload, write.ttl).await?;
    Ok(())
}
