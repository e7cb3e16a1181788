//! Inbound adapters that translate user input into domain service calls
//! while keeping terminal details at the edge.
//!
//! The command-line front ends live under [`cli`].

pub mod cli;
