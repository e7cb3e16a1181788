#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Blog command-line client.
//!
//! # Examples
//! ```sh
//! blog login --username ada
//! blog list --tag rust
//! blog create --title Hello --content "First post" --tags rust,web
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;
use client::inbound::cli::blog::{self, BlogCli};
use client::inbound::cli::{App, Outcome, Terminal, build_client, init_tracing, load_settings};

fn main() -> io::Result<ExitCode> {
    let cli = BlogCli::parse();
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: BlogCli) -> io::Result<ExitCode> {
    let settings = load_settings(App::Blog)?;
    let client = build_client(App::Blog, settings, &cli.connection.into())?;
    let mut term = Terminal::new(
        App::Blog,
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
    );
    Ok(match blog::run(client, cli.command, &mut term).await? {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Failed => ExitCode::FAILURE,
    })
}
