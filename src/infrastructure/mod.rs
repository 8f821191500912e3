//! Key-value backends implementing [`crate::domain::ports::KvStore`].

pub mod in_memory;
#[cfg(feature = "storage-redis")]
pub mod redis;
