//! Domain types of the tournament directory: records, the message protocol,
//! and the storage port the application layer depends on.

pub mod envelope;
pub mod key_pattern;
pub mod messages;
pub mod ports;
pub mod tournament;
