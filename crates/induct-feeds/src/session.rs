//! Relay session store — which messaging account belongs to which submitter.
//!
//! The relay never keeps sessions itself; a [`SessionStore`] is handed to it
//! at construction so the backing storage can be swapped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use induct_core::Submitter;

/// One linked messaging account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySession {
    pub account_id: String,
    /// Identity recorded on every record received through this account.
    pub submitter: Submitter,
    pub connected: bool,
    /// Phone number of the linked messaging account, once known.
    pub phone: Option<String>,
}

impl RelaySession {
    /// A connected session whose account id is the submitter's id.
    pub fn connected(submitter: Submitter) -> Self {
        Self {
            account_id: submitter.id.clone(),
            submitter,
            connected: true,
            phone: None,
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn get(&self, account_id: &str) -> Option<RelaySession>;
    fn put(&self, session: RelaySession);
    fn remove(&self, account_id: &str) -> Option<RelaySession>;
}

impl<T: SessionStore> SessionStore for Arc<T> {
    fn get(&self, account_id: &str) -> Option<RelaySession> {
        (**self).get(account_id)
    }

    fn put(&self, session: RelaySession) {
        (**self).put(session)
    }

    fn remove(&self, account_id: &str) -> Option<RelaySession> {
        (**self).remove(account_id)
    }
}

/// Mutex-guarded map keyed by account id.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, RelaySession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, RelaySession>> {
        // Every mutation is a single map call, so a poisoned map is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, account_id: &str) -> Option<RelaySession> {
        self.sessions().get(account_id).cloned()
    }

    fn put(&self, session: RelaySession) {
        self.sessions().insert(session.account_id.clone(), session);
    }

    fn remove(&self, account_id: &str) -> Option<RelaySession> {
        self.sessions().remove(account_id)
    }
}
