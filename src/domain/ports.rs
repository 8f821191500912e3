use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key-value backend with per-key expiry.
///
/// Patterns follow the Redis glob subset: `*` matches any run of characters,
/// `?` one character, and `\` escapes the next character.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Writes `value` under `key`, replacing any previous value and resetting
    /// its expiry to `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()>;
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;
    /// Returns whether a live key was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}

pub type KvStoreBox = Box<dyn KvStore>;

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        (**self).set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        (**self).keys(pattern).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key).await
    }
}
