//! Process-local session store.

use std::sync::{Mutex, MutexGuard};

use crate::domain::Session;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// Session store held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Option<Session>>, SessionStoreError> {
        self.session
            .lock()
            .map_err(|_| SessionStoreError::io("session lock poisoned"))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.guard()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.guard()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.guard()? = None;
        Ok(())
    }
}
