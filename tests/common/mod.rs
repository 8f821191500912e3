#![allow(dead_code)]

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tourney_directory::application::store::TournamentStore;
use tourney_directory::domain::ports::{KvStore, StoreResult};
use tourney_directory::domain::tournament::TournamentRecord;
use tourney_directory::error::StoreError;
use tourney_directory::infrastructure::in_memory::InMemoryKvStore;

pub const GAME_TYPES: [&str; 3] = ["poker", "mahjong", "doudizhu"];

pub fn record(game_type: &str, id: i32) -> TournamentRecord {
    TournamentRecord {
        id,
        name: format!("{game_type} cup {id}"),
        game_type: game_type.to_string(),
        match_type: "knockout".to_string(),
        entry_cost: Decimal::new(250, 2),
        server_id: "s1".to_string(),
        online: 0,
    }
}

/// `count` records with distinct `(game_type, id)` pairs and random contents.
pub fn random_records(count: usize) -> Vec<TournamentRecord> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let game_type = GAME_TYPES[i % GAME_TYPES.len()];
            let mut r = record(game_type, i as i32);
            r.online = rng.gen_range(0..500);
            r.entry_cost = Decimal::new(rng.gen_range(0..10_000), 2);
            r.match_type = if rng.gen_bool(0.5) { "knockout" } else { "league" }.to_string();
            r
        })
        .collect()
}

pub fn memory_store() -> Arc<TournamentStore> {
    Arc::new(TournamentStore::new(Box::new(InMemoryKvStore::new())))
}

/// Wraps an in-memory store and fails the `fail_on`-th write (1-based).
#[derive(Clone)]
pub struct FailingWrites {
    pub inner: InMemoryKvStore,
    pub writes: Arc<AtomicUsize>,
    pub fail_on: usize,
}

impl FailingWrites {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: InMemoryKvStore::new(),
            writes: Arc::new(AtomicUsize::new(0)),
            fail_on,
        }
    }
}

#[async_trait]
impl KvStore for FailingWrites {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on {
            return Err(StoreError::backend(std::io::Error::other("write refused")));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.inner.keys(pattern).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.inner.delete(key).await
    }
}
