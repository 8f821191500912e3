//! Application layer: the storage engine and the two dispatching services
//! built on top of it.
//!
//! [`player::PlayerService`] and [`admin::AdminService`] each own a
//! [`dispatcher::Dispatcher`] and share one [`store::TournamentStore`].

pub mod admin;
pub mod dispatcher;
pub mod player;
pub mod store;
