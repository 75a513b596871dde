//! Payments waiting for connectivity.
//!
//! The queue only parks requests; it never retries them and does no conflict
//! resolution. Whoever drains it decides what to resubmit.

use super::{generate_id, KeyValueStore};
use crate::domain::{Amount, PhoneNumber, UssdCode};
use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub const OFFLINE_QUEUE_KEY: &str = "ikanisa_offline_queue";

/// A payment recorded while the gateway was unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedPayment {
    pub id: String,
    pub phone: PhoneNumber,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basket_id: Option<String>,
    pub ussd_code: UssdCode,
    /// When the payment was queued (RFC 3339, UTC)
    pub queued_at: String,
}

impl QueuedPayment {
    pub fn new(
        phone: PhoneNumber,
        amount: Amount,
        basket_id: Option<String>,
        ussd_code: UssdCode,
    ) -> Self {
        Self {
            id: generate_id("offline"),
            phone,
            amount,
            basket_id,
            ussd_code,
            queued_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// FIFO list of [`QueuedPayment`]s stored as one JSON value.
pub struct OfflineQueue {
    store: Arc<dyn KeyValueStore>,
    // serializes read-modify-write cycles on the stored list
    write_lock: Mutex<()>,
}

impl OfflineQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Append a payment to the queue.
    pub fn enqueue(&self, payment: QueuedPayment) -> StorageResult<()> {
        let _guard = self.lock()?;
        let mut items = self.load()?;
        tracing::info!(id = %payment.id, "Queued payment for later submission");
        items.push(payment);
        self.save(&items)
    }

    /// All queued payments, oldest first.
    pub fn pending(&self) -> StorageResult<Vec<QueuedPayment>> {
        self.load()
    }

    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove one payment by id. Returns whether it was present.
    pub fn remove(&self, id: &str) -> StorageResult<bool> {
        let _guard = self.lock()?;
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|p| p.id != id);
        let removed = items.len() != before;
        if removed {
            self.save(&items)?;
        }
        Ok(removed)
    }

    /// Take every queued payment and empty the queue.
    pub fn drain(&self) -> StorageResult<Vec<QueuedPayment>> {
        let _guard = self.lock()?;
        let items = self.load()?;
        self.store.remove(OFFLINE_QUEUE_KEY)?;
        Ok(items)
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::Backend("offline queue lock poisoned".to_string()))
    }

    fn load(&self) -> StorageResult<Vec<QueuedPayment>> {
        match self.store.get(OFFLINE_QUEUE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, items: &[QueuedPayment]) -> StorageResult<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(OFFLINE_QUEUE_KEY, &raw)
    }
}
