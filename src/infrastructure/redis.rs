use crate::domain::ports::{KvStore, StoreResult};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Key-value store backed by a Redis server.
///
/// `ConnectionManager` multiplexes one reconnecting connection and is cheap to
/// clone, so every call works on its own handle and no client-side lock is
/// needed. This struct is `Clone` for the same reason.
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
}

impl RedisKvStore {
    /// Connects to the server at `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        tracing::info!(addr = %display_addr(&client), "Connected to redis");
        Ok(Self { connection })
    }
}

/// Host and port of the server, without credentials or database.
fn display_addr(client: &redis::Client) -> String {
    client.get_connection_info().addr.to_string()
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        // PSETEX rejects a zero expiry.
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let _: () = conn.pset_ex(key, value, millis).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        Ok(conn.get(key).await?)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.clone();
        Ok(conn.keys(pattern).await?)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }
}
