//! JWT-session-guarded REST clients for the expense tracker and blog
//! backends.
//!
//! The library holds the domain (session guard, resource client, use
//! cases), the outbound adapters (reqwest transport, session stores) and the
//! terminal front end shared by the `expenses` and `blog` binaries.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
