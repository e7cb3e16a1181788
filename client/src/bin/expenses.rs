#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Expense tracker command-line client.
//!
//! # Examples
//! ```sh
//! expenses login --username ada
//! expenses dashboard --month 2024-01
//! expenses add --description Coffee --amount 3.50 --category 2 --date 2024-01-01 --type expense
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;
use client::inbound::cli::expenses::{self, ExpensesCli};
use client::inbound::cli::{App, Outcome, Terminal, build_client, init_tracing, load_settings};

fn main() -> io::Result<ExitCode> {
    let cli = ExpensesCli::parse();
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: ExpensesCli) -> io::Result<ExitCode> {
    let settings = load_settings(App::Expenses)?;
    let client = build_client(App::Expenses, settings, &cli.connection.into())?;
    let mut term = Terminal::new(
        App::Expenses,
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
    );
    Ok(match expenses::run(client, cli.command, &mut term).await? {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Failed => ExitCode::FAILURE,
    })
}
