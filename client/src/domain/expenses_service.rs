//! Expense tracker use cases: dashboard, create, edit and delete.
//!
//! The dashboard issues its three loads concurrently and reports each one
//! separately, so a failing summary still leaves the transaction table
//! visible. Mutations refresh the list and summary afterwards.

use pagination::{ListEnvelope, Page as ResultsPage};
use tracing::info;
use url::Url;

use super::ports::{ApiTransport, SessionStore};
use super::{
    ApiClient, Category, Endpoint, Error, Page, RequestTarget, Summary, SummaryMonth, Transaction,
    TransactionDraft, TransactionFilter, TransactionForm,
};

/// Which slice of the transaction list to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransactionQuery {
    /// First page, unfiltered.
    #[default]
    First,
    /// First page with filters.
    Filtered(TransactionFilter),
    /// A `next`/`previous` link returned by the backend.
    Link(Url),
}

impl TransactionQuery {
    fn target(&self) -> RequestTarget {
        match self {
            Self::First => Endpoint::Transactions.into(),
            Self::Filtered(filter) => RequestTarget::with_query(Endpoint::Transactions, filter.query()),
            Self::Link(url) => RequestTarget::Link(url.clone()),
        }
    }
}

/// Summary and transaction list, each loaded independently.
#[derive(Debug)]
pub struct Ledger {
    /// Totals.
    pub summary: Result<Summary, Error>,
    /// Transactions in server order.
    pub transactions: Result<ResultsPage<Transaction>, Error>,
}

/// Everything the dashboard shows.
#[derive(Debug)]
pub struct Dashboard {
    /// Summary and transactions.
    pub ledger: Ledger,
    /// Options for the create form.
    pub categories: Result<Vec<Category>, Error>,
}

impl Dashboard {
    /// First redirect demanded by any of the loads.
    pub fn redirect(&self) -> Option<Page> {
        self.ledger
            .redirect()
            .or_else(|| self.categories.as_ref().err().and_then(Error::redirect))
    }
}

impl Ledger {
    /// First redirect demanded by either load.
    pub fn redirect(&self) -> Option<Page> {
        self.summary
            .as_ref()
            .err()
            .and_then(Error::redirect)
            .or_else(|| self.transactions.as_ref().err().and_then(Error::redirect))
    }
}

/// Transaction plus the category options for its edit form.
#[derive(Debug)]
pub struct EditForm {
    /// Transaction being edited.
    pub transaction: Transaction,
    /// Category options; a failure leaves the form usable.
    pub categories: Result<Vec<Category>, Error>,
}

/// Expense tracker use cases.
pub struct ExpensesService<T, S> {
    client: ApiClient<T, S>,
}

impl<T, S> ExpensesService<T, S> {
    /// Create the service.
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self { client }
    }
}

impl<T, S> ExpensesService<T, S>
where
    T: ApiTransport,
    S: SessionStore,
{
    /// Load summary, transactions and categories concurrently.
    pub async fn dashboard(
        &self,
        query: &TransactionQuery,
        month: Option<SummaryMonth>,
    ) -> Result<Dashboard, Error> {
        self.client.session()?;
        let (summary, transactions, categories) = futures_util::join!(
            self.summary(month),
            self.transactions(query),
            self.categories(),
        );
        Ok(Dashboard {
            ledger: Ledger {
                summary,
                transactions,
            },
            categories: categories.map_err(|err| err.with_fallback("Failed to fetch categories")),
        })
    }

    /// Income and expense totals, optionally for one month.
    pub async fn summary(&self, month: Option<SummaryMonth>) -> Result<Summary, Error> {
        let query = month
            .map(|month| vec![("month".to_owned(), month.as_query())])
            .unwrap_or_default();
        self.client
            .get(RequestTarget::with_query(Endpoint::TransactionSummary, query))
            .await
            .map_err(|err| err.with_fallback("Failed to fetch summary"))
    }

    /// One page of transactions.
    pub async fn transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<ResultsPage<Transaction>, Error> {
        self.client
            .get::<ListEnvelope<Transaction>>(query.target())
            .await
            .map(ResultsPage::from)
            .map_err(|err| err.with_fallback("Failed to fetch transactions"))
    }

    /// All categories.
    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.client
            .get::<ListEnvelope<Category>>(Endpoint::Categories)
            .await
            .map(|envelope| ResultsPage::from(envelope).into_items())
    }

    /// Validate and create a transaction, then reload list and summary.
    ///
    /// An invalid form fails with a validation error and sends nothing.
    pub async fn create(&self, form: &TransactionForm) -> Result<Ledger, Error> {
        let draft =
            TransactionDraft::try_from_form(form).map_err(|err| Error::validation(err.to_string()))?;
        let created: Transaction = self
            .client
            .post(Endpoint::Transactions, &draft)
            .await
            .map_err(|err| err.with_fallback("Failed to create transaction"))?;
        info!(id = created.id, "transaction created");
        Ok(self.reload().await)
    }

    /// Delete a transaction, then reload list and summary.
    pub async fn delete(&self, id: i64) -> Result<Ledger, Error> {
        self.client
            .delete(Endpoint::Transaction(id))
            .await
            .map_err(|err| err.with_fallback("Failed to delete transaction"))?;
        info!(id, "transaction deleted");
        Ok(self.reload().await)
    }

    /// Load a transaction and the category options for editing.
    pub async fn edit_form(&self, id: i64) -> Result<EditForm, Error> {
        let transaction = self
            .client
            .get(Endpoint::Transaction(id))
            .await
            .map_err(|err| err.with_fallback("Failed to fetch transaction"))?;
        let categories = self
            .categories()
            .await
            .map_err(|err| err.with_fallback("Could not load categories."));
        Ok(EditForm {
            transaction,
            categories,
        })
    }

    /// Validate and replace a transaction. Returns [`Page::Index`].
    pub async fn update(&self, id: i64, form: &TransactionForm) -> Result<Page, Error> {
        let draft =
            TransactionDraft::try_from_form(form).map_err(|err| Error::validation(err.to_string()))?;
        self.client
            .put::<_, serde_json::Value>(Endpoint::Transaction(id), &draft)
            .await
            .map_err(|err| err.with_fallback("Failed to update transaction"))?;
        info!(id, "transaction updated");
        Ok(Page::Index)
    }

    async fn reload(&self) -> Ledger {
        let (summary, transactions) = futures_util::join!(
            self.summary(None),
            self.transactions(&TransactionQuery::First),
        );
        Ledger {
            summary,
            transactions,
        }
    }
}

#[cfg(test)]
mod tests;
