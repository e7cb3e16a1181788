//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed `ApiTransport`
//! - **session**: file and in-memory `SessionStore` implementations
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod session;
