//! Tournament directory: a leased cache of live tournaments behind two
//! type-routed services.
//!
//! - [`application::player::PlayerService`] lists tournaments for players.
//! - [`application::admin::AdminService`] takes state pushes from game servers.
//! - [`application::store::TournamentStore`] keeps records in a
//!   [`domain::ports::KvStore`] with a per-record TTL.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
