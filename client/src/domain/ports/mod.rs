//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_transport;
mod session_store;

#[cfg(test)]
pub use api_transport::MockApiTransport;
pub use api_transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportError};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
