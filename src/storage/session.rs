//! Per-device session state.

use super::{generate_id, KeyValueStore};
use crate::domain::PhoneNumber;
use crate::error::StorageResult;
use std::sync::Arc;

pub const SESSION_ID_KEY: &str = "ikanisa_session_id";
pub const USER_PHONE_KEY: &str = "ikanisa_user_phone";

/// Session identifier and remembered phone number.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the current session id, creating one on first use.
    pub fn session_id(&self) -> StorageResult<String> {
        if let Some(id) = self.store.get(SESSION_ID_KEY)? {
            return Ok(id);
        }

        let id = generate_id("session");
        self.store.set(SESSION_ID_KEY, &id)?;
        tracing::debug!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Phone number last used on this device.
    pub fn phone(&self) -> StorageResult<Option<PhoneNumber>> {
        Ok(self
            .store
            .get(USER_PHONE_KEY)?
            .map(|raw| PhoneNumber::normalize(&raw)))
    }

    pub fn remember_phone(&self, phone: &PhoneNumber) -> StorageResult<()> {
        self.store.set(USER_PHONE_KEY, phone.as_str())
    }

    /// Forget the session id and phone.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(SESSION_ID_KEY)?;
        self.store.remove(USER_PHONE_KEY)
    }
}
