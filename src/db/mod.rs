pub mod interactions;
pub mod postgres;
pub mod redis;

pub use interactions::{InteractionStore, MemoryInteractionStore, PgInteractionStore};
pub use postgres::create_pool;
pub use redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
