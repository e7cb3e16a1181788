//! Terminal front ends for the expense tracker and the blog.
//!
//! Each binary parses a clap command, runs one use case, then renders the
//! result, surfaces the error, or announces the next page.

pub mod account;
pub mod blog;
pub mod bootstrap;
pub mod expenses;
pub mod render;
pub mod surface;

pub use self::bootstrap::{ClientOverrides, build_client, init_tracing, load_settings};
pub use self::surface::{App, Outcome, Terminal};
