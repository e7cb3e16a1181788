//! Domain primitives, ports and use cases.
//!
//! Purpose: model the session, the backend endpoints and the resources the
//! two clients manage, independent of HTTP library or storage. Services are
//! generic over the [`ports::ApiTransport`] and [`ports::SessionStore`]
//! ports; adapters live in `crate::outbound`.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: classified failure with the message to surface.
//! - `Session`, `AccessToken`, `RefreshToken`: stored JWT pair.
//! - `ApiClient`: guarded request core shared by every service.
//! - `AuthService`, `ExpensesService`, `BlogService`: use cases.

pub mod api_client;
pub mod auth;
pub mod auth_service;
pub mod blog_service;
pub mod endpoint;
pub mod error;
mod error_body;
pub mod expenses_service;
pub mod guard;
mod lenient;
pub mod navigation;
pub mod ports;
pub mod post;
pub mod session;
pub mod slug;
pub mod transaction;

pub use self::api_client::ApiClient;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration, RegistrationForm};
pub use self::auth_service::{AuthService, Backend};
pub use self::blog_service::{BlogService, PostView};
pub use self::endpoint::{Endpoint, RequestTarget};
pub use self::error::{Error, ErrorCode, NETWORK_ERROR_MESSAGE};
pub use self::expenses_service::{Dashboard, EditForm, ExpensesService, Ledger, TransactionQuery};
pub use self::guard::require_session;
pub use self::lenient::parse_amount_value;
pub use self::navigation::Page;
pub use self::post::{
    Author, Post, PostDraft, PostFilter, PostForm, PostFormError, PostPatch, TagRef, split_tags,
};
pub use self::session::{
    ACCESS_KEY, AccessToken, ClaimsError, REFRESH_KEY, RefreshToken, Session, TokenClaims,
    TokenValidationError,
};
pub use self::slug::{PostSlug, SlugValidationError};
pub use self::transaction::{
    Category, CategoryRef, InvalidMonth, NOT_AVAILABLE, Summary, SummaryMonth, Transaction,
    TransactionDraft, TransactionFilter, TransactionForm, TransactionFormError, TransactionKind,
};

/// Result alias for use cases.
pub type ClientResult<T> = Result<T, Error>;
