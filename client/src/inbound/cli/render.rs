//! Plain-text views of domain data.
//!
//! Rows keep server order. Actions are shown as the commands that perform
//! them.

use pagination::Page as ResultsPage;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{Category, Page, Post, PostView, Summary, Transaction};

use super::App;

/// Message shown for an empty transaction list.
pub const NO_TRANSACTIONS: &str = "No transactions found.";
/// Message shown for an empty post list.
pub const NO_POSTS: &str = "No posts found.";
/// Placeholder leading the create-form category list.
pub const SELECT_CATEGORY: &str = "Select Category";

/// One transaction row.
///
/// # Examples
/// ```
/// use client::inbound::cli::render::transaction_row;
///
/// let tx = serde_json::from_value(serde_json::json!({
///     "id": 1, "title": "Coffee", "amount": "3.5", "type": "expense",
///     "category": 2, "created_at": "2024-01-01T00:00:00Z"
/// })).unwrap();
/// let row = transaction_row(&tx);
/// assert!(row.starts_with("Coffee | 3.50 | 2 | 2024-01-01 | expense"));
/// ```
pub fn transaction_row(transaction: &Transaction) -> String {
    let created = transaction
        .created_on()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "{} | {} | {} | {} | {} | [edit: {}] [delete: {} delete {}]",
        transaction.display_description(),
        money(transaction.amount_or_zero()),
        transaction.display_category(),
        created,
        transaction.display_kind(),
        App::Expenses.command_for(&Page::Edit { id: transaction.id }),
        App::Expenses.name(),
        transaction.id,
    )
}

/// Transaction table, or [`NO_TRANSACTIONS`].
pub fn transactions(page: &ResultsPage<Transaction>) -> String {
    if page.is_empty() {
        return NO_TRANSACTIONS.to_owned();
    }
    let mut out = String::from("Description | Amount | Category | Date | Type | Actions");
    for transaction in page.items() {
        out.push('\n');
        out.push_str(&transaction_row(transaction));
    }
    out.push_str(&page_links(App::Expenses, "dashboard", page));
    out
}

/// Income, expense and balance totals.
pub fn summary(summary: &Summary) -> String {
    format!(
        "Total income: {}\nTotal expenses: {}\nNet balance: {}",
        money(summary.income()),
        money(summary.expenses()),
        money(summary.balance())
    )
}

/// Category options for the create form, led by [`SELECT_CATEGORY`].
pub fn category_options(categories: &[Category]) -> String {
    std::iter::once(format!("  (none) {SELECT_CATEGORY}"))
        .chain(
            categories
                .iter()
                .map(|category| format!("  {} {}", category.id, category.label())),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Category options for the edit form with `selected` marked.
pub fn category_options_selected(categories: &[Category], selected: Option<i64>) -> String {
    categories
        .iter()
        .map(|category| {
            let marker = if Some(category.id) == selected { '*' } else { ' ' };
            format!("{marker} {} {}", category.id, category.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Edit form prefilled from `transaction`.
pub fn transaction_form(transaction: &Transaction) -> String {
    format!(
        "Editing transaction {id}\n  description: {}\n  amount: {}\n  date: {}\n  type: {}\nSave with `{} update {id} ...`",
        transaction.display_description(),
        money(transaction.amount_or_zero()),
        transaction.date.as_deref().unwrap_or_default(),
        transaction.display_kind(),
        App::Expenses.name(),
        id = transaction.id,
    )
}

/// One post line with its detail target.
pub fn post_row(post: &Post) -> String {
    match &post.slug {
        Some(slug) => format!(
            "{} -> {}",
            post.display_title(),
            Page::Detail { slug: slug.clone() }.href()
        ),
        None => post.display_title().to_owned(),
    }
}

/// Post list, or [`NO_POSTS`].
pub fn posts(page: &ResultsPage<Post>) -> String {
    if page.is_empty() {
        return NO_POSTS.to_owned();
    }
    let mut out = page
        .items()
        .iter()
        .map(post_row)
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&page_links(App::Blog, "list", page));
    out
}

/// Full post with actions for its author.
pub fn post_detail(view: &PostView) -> String {
    let post = &view.post;
    let mut out = format!(
        "{}\nBy {} on {}\n\n{}",
        post.display_title(),
        post.author_name(),
        post.created_at.as_deref().unwrap_or_default(),
        post.body()
    );
    if !post.tags.is_empty() {
        let tags = post
            .tags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\n\nTags: {tags}"));
    }
    if let (true, Some(slug)) = (view.can_manage, post.slug.as_ref()) {
        let name = App::Blog.name();
        out.push_str(&format!(
            "\n\n[edit: {name} update {slug} --title ... --content ...] [delete: {name} delete {slug}]"
        ));
    }
    out
}

/// Two decimal places, half away from zero.
fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn page_links<T>(app: App, command: &str, page: &ResultsPage<T>) -> String {
    let name = app.name();
    let mut out = String::new();
    if let Some(previous) = page.previous() {
        out.push_str(&format!("\nPrevious page: {name} {command} --page '{previous}'"));
    }
    if let Some(next) = page.next() {
        out.push_str(&format!("\nNext page: {name} {command} --page '{next}'"));
    }
    out
}
