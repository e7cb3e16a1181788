//! Session store adapters.
//!
//! The CLI keeps tokens in a JSON file; tests and embedders can use the
//! in-memory store.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
