//! Session guard run before every authenticated use case.

use tracing::warn;

use super::Error;
use super::Session;
use super::ports::SessionStore;

/// Return the stored session or a redirect-to-login error.
///
/// No request is issued here; callers run the guard before touching the
/// transport. An unreadable store is logged and treated as signed out.
pub fn require_session<S>(store: &S) -> Result<Session, Error>
where
    S: SessionStore + ?Sized,
{
    match store.load() {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(Error::missing_session()),
        Err(error) => {
            warn!(%error, "session store unreadable; treating as signed out");
            Err(Error::missing_session())
        }
    }
}
