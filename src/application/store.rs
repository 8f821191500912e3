use crate::domain::key_pattern;
use crate::domain::ports::KvStoreBox;
use crate::domain::tournament::{self, KEY_SEPARATOR, TournamentQuery, TournamentRecord};
use crate::error::Result;
use std::time::Duration;

/// How long a tournament stays listed without being refreshed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
/// Shortest lease; a zero TTL would make every write invisible.
pub const MIN_TTL: Duration = Duration::from_secs(1);
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Leased cache of live tournament state on top of a [`crate::domain::ports::KvStore`].
///
/// Every write refreshes the record's expiry; a tournament that stops being
/// pushed by its game server drops out after the TTL.
pub struct TournamentStore {
    kv: KvStoreBox,
    ttl: Duration,
}

impl TournamentStore {
    pub fn new(kv: KvStoreBox) -> Self {
        Self::with_ttl(kv, DEFAULT_TTL)
    }

    /// Uses `ttl` as the lease, clamped to [`MIN_TTL`]..=[`MAX_TTL`].
    pub fn with_ttl(kv: KvStoreBox, ttl: Duration) -> Self {
        let clamped = ttl.clamp(MIN_TTL, MAX_TTL);
        if clamped != ttl {
            tracing::warn!(requested = ?ttl, using = ?clamped, "Tournament TTL out of range");
        }
        Self { kv, ttl: clamped }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Writes `record` under its storage key, overwriting and re-leasing it.
    pub async fn put(&self, record: &TournamentRecord) -> Result<()> {
        let key = record.storage_key();
        let value = serde_json::to_vec(record)?;
        self.kv.set(&key, value, self.ttl).await?;
        tracing::debug!(%key, "Stored tournament");
        Ok(())
    }

    /// Returns every live record matching `query`, in key order.
    ///
    /// Keys that vanish between enumeration and read, or whose value no longer
    /// decodes, are skipped. Only a failure to enumerate is reported.
    pub async fn scan(&self, query: &TournamentQuery) -> Result<Vec<TournamentRecord>> {
        let pattern = Self::pattern_for(query);
        let mut keys = self.kv.keys(&pattern).await?;
        keys.sort();

        let mut records = Vec::new();
        for key in keys {
            let bytes = match self.kv.get(&key).await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(%key, error = %e, "Skipping unreadable key");
                    continue;
                }
            };
            let record: TournamentRecord = match serde_json::from_slice(&bytes) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(%key, error = %e, "Skipping undecodable record");
                    continue;
                }
            };
            if query.matches(&record) {
                records.push(record);
            }
        }

        tracing::debug!(%pattern, found = records.len(), "Scanned tournaments");
        Ok(records)
    }

    /// Drops a tournament before its lease runs out.
    pub async fn remove(&self, game_type: &str, id: i32) -> Result<bool> {
        let key = tournament::storage_key(game_type, id);
        Ok(self.kv.delete(&key).await?)
    }

    /// Narrows enumeration to one partition when the query pins the game type.
    fn pattern_for(query: &TournamentQuery) -> String {
        match &query.game_type {
            Some(game_type) => format!("{}{}*", key_pattern::escape(game_type), KEY_SEPARATOR),
            None => "*".to_string(),
        }
    }
}
