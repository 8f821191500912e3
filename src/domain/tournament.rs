use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Separator between the game type and the id in a storage key.
pub const KEY_SEPARATOR: char = ':';

/// Live state of one tournament, as pushed by the game-logic servers.
///
/// `(game_type, id)` identifies the record; see [`TournamentRecord::storage_key`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentRecord {
    pub id: i32,
    pub name: String,
    pub game_type: String,
    pub match_type: String,
    /// Older producers still send this as `sign_condition`.
    #[serde(alias = "sign_condition")]
    pub entry_cost: Decimal,
    pub server_id: String,
    pub online: u32,
}

impl TournamentRecord {
    pub fn storage_key(&self) -> String {
        storage_key(&self.game_type, self.id)
    }
}

/// Derives the storage key `"<game_type>:<id>"`.
///
/// The id is an integer, so splitting at the last separator always recovers the
/// pair and two distinct pairs never share a key.
pub fn storage_key(game_type: &str, id: i32) -> String {
    format!("{game_type}{KEY_SEPARATOR}{id}")
}

/// Player-facing view of a tournament returned by the list operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSummary {
    pub id: i32,
    pub name: String,
    pub game_type: String,
    pub match_type: String,
    pub entry_cost: Decimal,
    pub server_id: String,
    pub online: u32,
}

impl From<TournamentRecord> for TournamentSummary {
    fn from(record: TournamentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            game_type: record.game_type,
            match_type: record.match_type,
            entry_cost: record.entry_cost,
            server_id: record.server_id,
            online: record.online,
        }
    }
}

pub type RecordPredicate = Arc<dyn Fn(&TournamentRecord) -> bool + Send + Sync>;

/// Declarative filter for [`crate::application::store::TournamentStore::scan`].
///
/// Equality fields are declared structurally so the store can narrow the key
/// enumeration to one partition. `predicate` is an extra opaque filter; it is
/// only ever applied to decoded records, never used to guess a partition.
#[derive(Clone, Default)]
pub struct TournamentQuery {
    pub game_type: Option<String>,
    pub match_type: Option<String>,
    pub server_id: Option<String>,
    pub predicate: Option<RecordPredicate>,
}

impl TournamentQuery {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn game_type(game_type: impl Into<String>) -> Self {
        Self {
            game_type: Some(game_type.into()),
            ..Self::default()
        }
    }

    pub fn with_match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = Some(match_type.into());
        self
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TournamentRecord) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn matches(&self, record: &TournamentRecord) -> bool {
        fn field_ok(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().is_none_or(|w| w == actual)
        }

        field_ok(&self.game_type, &record.game_type)
            && field_ok(&self.match_type, &record.match_type)
            && field_ok(&self.server_id, &record.server_id)
            && self.predicate.as_ref().is_none_or(|p| p(record))
    }
}

impl fmt::Debug for TournamentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TournamentQuery")
            .field("game_type", &self.game_type)
            .field("match_type", &self.match_type)
            .field("server_id", &self.server_id)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
