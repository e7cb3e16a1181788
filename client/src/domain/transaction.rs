//! Expense tracker records and forms.
//!
//! Records are server-owned and decoded leniently: every display field is
//! optional and the accessors spell out the default. Forms are the opposite:
//! raw strings are parsed strictly and a failed parse blocks submission.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{self, first_non_empty};

/// Placeholder for missing display values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// Wire value of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(TransactionFormError::InvalidKind),
        }
    }
}

/// Category reference on a transaction: usually an id, sometimes a name or a
/// nested category record. Anything else is kept raw and displays as blank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Category primary key.
    Id(i64),
    /// Category name.
    Name(String),
    /// Embedded category record.
    Nested(Category),
    /// Unrecognised shape.
    Other(Value),
}

impl CategoryRef {
    /// Category id, when one is known.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Nested(category) => Some(category.id),
            Self::Name(_) | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
            Self::Nested(category) => f.write_str(&category.label()),
            Self::Other(_) => Ok(()),
        }
    }
}

/// One transaction as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// Server identifier used for edit and delete.
    pub id: i64,
    /// Primary description.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    /// Older description field.
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    /// Amount as sent by the server, if readable.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<Decimal>,
    /// Category reference.
    #[serde(default)]
    pub category: Option<CategoryRef>,
    /// Booking date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    /// `income` or `expense`, kept raw.
    #[serde(default, rename = "type", deserialize_with = "lenient::text")]
    pub kind: Option<String>,
}

impl Transaction {
    /// `title`, then `description`, then `N/A`.
    pub fn display_description(&self) -> &str {
        first_non_empty(&[self.title.as_deref(), self.description.as_deref()])
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Amount, or zero when missing or unreadable.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// Category label, or `N/A`.
    pub fn display_category(&self) -> String {
        self.category
            .as_ref()
            .map(ToString::to_string)
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
    }

    /// Raw kind, or `N/A`.
    pub fn display_kind(&self) -> &str {
        first_non_empty(&[self.kind.as_deref()]).unwrap_or(NOT_AVAILABLE)
    }

    /// Calendar date of `created_at` in the offset it was sent with.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
            .map(|timestamp| timestamp.date_naive())
    }
}

/// Income and expense totals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Summary {
    /// Sum of income.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_income: Option<Decimal>,
    /// Sum of expenses. Older backends send `total_expenses`.
    #[serde(default, alias = "total_expenses", deserialize_with = "lenient::amount")]
    pub total_expense: Option<Decimal>,
    /// Income minus expenses.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub net_balance: Option<Decimal>,
}

impl Summary {
    /// Income total, defaulting to zero.
    pub fn income(&self) -> Decimal {
        self.total_income.unwrap_or(Decimal::ZERO)
    }

    /// Expense total, defaulting to zero.
    pub fn expenses(&self) -> Decimal {
        self.total_expense.unwrap_or(Decimal::ZERO)
    }

    /// Net balance, defaulting to zero.
    pub fn balance(&self) -> Decimal {
        self.net_balance.unwrap_or(Decimal::ZERO)
    }
}

/// Category used to populate selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Category primary key.
    pub id: i64,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Alternative display name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
}

impl Category {
    /// `name`, then `title`, then `Category <id>`.
    pub fn label(&self) -> String {
        first_non_empty(&[self.name.as_deref(), self.title.as_deref()])
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Category {}", self.id))
    }
}

/// Reasons a transaction form is rejected before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionFormError {
    /// Description was blank.
    MissingDescription,
    /// Amount did not parse as a decimal number.
    InvalidAmount,
    /// Category was missing, not an integer, or zero.
    InvalidCategory,
    /// Date was missing or not `YYYY-MM-DD`.
    InvalidDate,
    /// Type was not `income` or `expense`.
    InvalidKind,
}

impl fmt::Display for TransactionFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescription => write!(f, "Please fill all fields correctly: description is required."),
            Self::InvalidAmount => write!(f, "Please fill all fields correctly: amount must be a number."),
            Self::InvalidCategory => write!(f, "Please fill all fields correctly: select a category."),
            Self::InvalidDate => write!(f, "Please fill all fields correctly: date must be YYYY-MM-DD."),
            Self::InvalidKind => write!(f, "Please fill all fields correctly: type must be income or expense."),
        }
    }
}

impl std::error::Error for TransactionFormError {}

/// Raw transaction form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    /// Description text.
    pub description: String,
    /// Amount text.
    pub amount: String,
    /// Selected category id.
    pub category: String,
    /// Booking date.
    pub date: String,
    /// `income` or `expense`.
    pub kind: String,
}

/// Validated transaction payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDraft {
    title: String,
    amount: Decimal,
    category: i64,
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: TransactionKind,
}

impl TransactionDraft {
    /// Parse and validate a form.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{TransactionDraft, TransactionForm};
    ///
    /// let form = TransactionForm {
    ///     description: "Coffee".into(),
    ///     amount: "abc".into(),
    ///     category: "2".into(),
    ///     date: "2024-01-01".into(),
    ///     kind: "expense".into(),
    /// };
    /// assert!(TransactionDraft::try_from_form(&form).is_err());
    /// ```
    pub fn try_from_form(form: &TransactionForm) -> Result<Self, TransactionFormError> {
        let title = form.description.trim();
        if title.is_empty() {
            return Err(TransactionFormError::MissingDescription);
        }
        let amount = Decimal::from_str(form.amount.trim())
            .map_err(|_| TransactionFormError::InvalidAmount)?;
        let category = form
            .category
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(TransactionFormError::InvalidCategory)?;
        let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
            .map_err(|_| TransactionFormError::InvalidDate)?;
        let kind = TransactionKind::from_str(&form.kind)?;
        Ok(Self {
            title: title.to_owned(),
            amount,
            category,
            date,
            kind,
        })
    }
}

/// Validation errors for a summary month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth;

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid month format. Use YYYY-MM.")
    }
}

impl std::error::Error for InvalidMonth {}

/// Month filter for the summary endpoint, `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryMonth(NaiveDate);

impl SummaryMonth {
    /// Query value sent to the backend.
    pub fn as_query(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl FromStr for SummaryMonth {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 7 {
            return Err(InvalidMonth);
        }
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidMonth)
    }
}

/// Filters accepted by the transaction list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions in this category.
    pub category: Option<i64>,
    /// Created on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Created on or before this date.
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Query parameters in a stable order.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(category) = self.category {
            query.push(("category".to_owned(), category.to_string()));
        }
        if let Some(start) = self.start_date {
            query.push(("start_date".to_owned(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("end_date".to_owned(), end.format("%Y-%m-%d").to_string()));
        }
        query
    }
}
