//! HTTP outbound adapters.
//!
//! This module provides a thin reqwest implementation of the `ApiTransport`
//! port.

mod transport;

pub use transport::{HttpApiTransport, HttpTransportSettings};
