//! Driven port for persisting the signed-in session.
//!
//! The store holds two keys, `access` and `refresh`. A missing store or a
//! missing access key both mean "signed out".

use super::define_port_error;
use crate::domain::Session;

define_port_error! {
    /// Errors raised by session persistence.
    pub enum SessionStoreError {
        /// Underlying storage could not be read or written.
        Io { message: String } =>
            "session storage failed: {message}",
        /// Stored data could not be parsed.
        Corrupt { message: String } =>
            "stored session is unreadable: {message}",
    }
}

/// Port for loading and saving tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Current session, or `None` when signed out.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove both tokens. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;
}
