//! Injected key-value storage.
//!
//! Session identifiers and the offline payment queue live behind the
//! [`KeyValueStore`] trait so any persistent store (device storage, a file,
//! a database table) can back them.

mod memory;
mod offline_queue;
mod session;

pub use memory::InMemoryStore;
pub use offline_queue::{OfflineQueue, QueuedPayment, OFFLINE_QUEUE_KEY};
pub use session::{SessionStore, SESSION_ID_KEY, USER_PHONE_KEY};

use crate::error::StorageResult;
use std::sync::atomic::{AtomicU64, Ordering};

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique identifier `{prefix}_{millis}_{counter}`.
pub(crate) fn generate_id(prefix: &str) -> String {
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}_{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        counter
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_unique() {
        let a = generate_id("session");
        let b = generate_id("session");
        assert_ne!(a, b);
        assert!(a.starts_with("session_"));
    }
}
