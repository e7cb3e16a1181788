//! `expenses` subcommands and their dispatch.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::domain::ports::{ApiTransport, SessionStore};
use crate::domain::{
    ApiClient, Dashboard, ExpensesService, Ledger, SummaryMonth, TransactionFilter,
    TransactionForm, TransactionQuery,
};

use super::account::{self, AccountCommand, ConnectionArgs};
use super::{Outcome, Terminal, render};

/// Expense tracker client.
#[derive(Debug, Parser)]
#[command(
    name = "expenses",
    about = "Track income and expenses against the expense tracker API",
    version
)]
pub struct ExpensesCli {
    /// Connection overrides.
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Command to run.
    #[command(subcommand)]
    pub command: ExpensesCommand,
}

/// Transaction form fields. Blank values are rejected before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct TransactionArgs {
    /// Description.
    #[arg(long, default_value_t)]
    pub description: String,
    /// Amount, e.g. `3.50`.
    #[arg(long, default_value_t)]
    pub amount: String,
    /// Category id.
    #[arg(long, default_value_t)]
    pub category: String,
    /// Booking date, `YYYY-MM-DD`.
    #[arg(long, default_value_t)]
    pub date: String,
    /// `income` or `expense`.
    #[arg(long = "type", value_name = "TYPE", default_value_t)]
    pub kind: String,
}

impl From<TransactionArgs> for TransactionForm {
    fn from(args: TransactionArgs) -> Self {
        Self {
            description: args.description,
            amount: args.amount,
            category: args.category,
            date: args.date,
            kind: args.kind,
        }
    }
}

/// Expense tracker subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ExpensesCommand {
    /// Account commands.
    #[command(flatten)]
    Account(AccountCommand),
    /// Summary, transactions and category options.
    Dashboard {
        /// Category id filter.
        #[arg(long)]
        category: Option<i64>,
        /// Earliest booking date.
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: Option<NaiveDate>,
        /// Latest booking date.
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: Option<NaiveDate>,
        /// Restrict the summary to one month.
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<SummaryMonth>,
        /// Follow a pagination link printed by a previous listing.
        #[arg(long, value_name = "URL", conflicts_with_all = ["category", "start_date", "end_date"])]
        page: Option<Url>,
    },
    /// Record a transaction.
    Add(TransactionArgs),
    /// Show a transaction with its edit form.
    Edit {
        /// Transaction id.
        id: i64,
    },
    /// Replace a transaction.
    Update {
        /// Transaction id.
        id: i64,
        /// New values.
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction.
    Delete {
        /// Transaction id.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn transaction_query(
    category: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    page: Option<Url>,
) -> TransactionQuery {
    if let Some(link) = page {
        return TransactionQuery::Link(link);
    }
    let filter = TransactionFilter {
        category,
        start_date,
        end_date,
    };
    if filter == TransactionFilter::default() {
        TransactionQuery::First
    } else {
        TransactionQuery::Filtered(filter)
    }
}

/// Run an `expenses` subcommand.
///
/// # Errors
///
/// Returns an error only when the terminal cannot be written or read.
pub async fn run<T, S, I, O, E>(
    client: ApiClient<T, S>,
    command: ExpensesCommand,
    term: &mut Terminal<I, O, E>,
) -> io::Result<Outcome>
where
    T: ApiTransport,
    S: SessionStore,
    I: BufRead,
    O: Write,
    E: Write,
{
    let service = ExpensesService::new(client.clone());
    match command {
        ExpensesCommand::Account(command) => account::run(client, command, term).await,
        ExpensesCommand::Dashboard {
            category,
            start_date,
            end_date,
            month,
            page,
        } => {
            let query = transaction_query(category, start_date, end_date, page);
            match service.dashboard(&query, month).await {
                Ok(dashboard) => show_dashboard(term, &dashboard),
                Err(error) => term.show_error(&error),
            }
        }
        ExpensesCommand::Add(fields) => match service.create(&fields.into()).await {
            Ok(ledger) => show_ledger(term, &ledger),
            Err(error) => term.show_error(&error),
        },
        ExpensesCommand::Edit { id } => match service.edit_form(id).await {
            Ok(form) => {
                term.show(&render::transaction_form(&form.transaction))?;
                let selected = form
                    .transaction
                    .category
                    .as_ref()
                    .and_then(|category| category.id());
                match &form.categories {
                    Ok(categories) => {
                        term.show("Categories:")?;
                        term.show(&render::category_options_selected(categories, selected))?;
                        Ok(Outcome::Completed)
                    }
                    Err(error) => {
                        term.warn(error)?;
                        Ok(Outcome::Failed)
                    }
                }
            }
            Err(error) => term.show_error(&error),
        },
        ExpensesCommand::Update { id, fields } => match service.update(id, &fields.into()).await {
            Ok(page) => {
                term.navigate(&page)?;
                Ok(Outcome::Completed)
            }
            Err(error) => term.show_error(&error),
        },
        ExpensesCommand::Delete { id, yes } => {
            if !yes && !term.confirm("Are you sure you want to delete this transaction?")? {
                term.show("Cancelled.")?;
                return Ok(Outcome::Completed);
            }
            match service.delete(id).await {
                Ok(ledger) => show_ledger(term, &ledger),
                Err(error) => term.show_error(&error),
            }
        }
    }
}

fn show_dashboard<I, O, E>(term: &mut Terminal<I, O, E>, dashboard: &Dashboard) -> io::Result<Outcome>
where
    I: BufRead,
    O: Write,
    E: Write,
{
    if let Some(page) = dashboard.redirect() {
        term.navigate(&page)?;
        return Ok(Outcome::Failed);
    }
    let mut outcome = show_ledger(term, &dashboard.ledger)?;
    match &dashboard.categories {
        Ok(categories) => {
            term.show("Categories for `expenses add --category <id>`:")?;
            term.show(&render::category_options(categories))?;
        }
        Err(error) => {
            term.warn(error)?;
            outcome = Outcome::Failed;
        }
    }
    Ok(outcome)
}

fn show_ledger<I, O, E>(term: &mut Terminal<I, O, E>, ledger: &Ledger) -> io::Result<Outcome>
where
    I: BufRead,
    O: Write,
    E: Write,
{
    if let Some(page) = ledger.redirect() {
        term.navigate(&page)?;
        return Ok(Outcome::Failed);
    }
    let mut outcome = Outcome::Completed;
    match &ledger.summary {
        Ok(summary) => term.show(&render::summary(summary))?,
        Err(error) => {
            term.warn(error)?;
            outcome = Outcome::Failed;
        }
    }
    match &ledger.transactions {
        Ok(page) => term.show(&render::transactions(page))?,
        Err(error) => {
            term.warn(error)?;
            outcome = Outcome::Failed;
        }
    }
    Ok(outcome)
}
