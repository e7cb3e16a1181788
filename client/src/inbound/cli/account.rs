//! Commands shared by both binaries: sign in, sign up, sign out, refresh.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::domain::ports::{ApiTransport, SessionStore};
use crate::domain::{
    ApiClient, AuthService, Backend, Error, LoginCredentials, Page, RegistrationForm,
};

use super::bootstrap::ClientOverrides;
use super::{App, Outcome, Terminal};

/// Flags that override loaded settings.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Backend origin, e.g. `http://127.0.0.1:8000`.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
    /// File holding the stored tokens.
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,
}

impl From<ConnectionArgs> for ClientOverrides {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            base_url: args.base_url,
            session_file: args.session_file,
        }
    }
}

/// Account subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum AccountCommand {
    /// Sign in and store the token pair.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account.
    Register {
        /// Requested account name.
        #[arg(long)]
        username: String,
        /// Contact email.
        #[arg(long, default_value_t)]
        email: String,
        /// Password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Repeated password; prompted for when omitted.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the stored tokens.
    Logout,
    /// Exchange the refresh token for a new access token.
    Refresh,
}

impl App {
    fn backend(self) -> Backend {
        match self {
            Self::Expenses => Backend::Expenses,
            Self::Blog => Backend::Blog,
        }
    }
}

/// Run an account command.
///
/// # Errors
///
/// Returns an error only when the terminal cannot be written or read.
pub async fn run<T, S, I, O, E>(
    client: ApiClient<T, S>,
    command: AccountCommand,
    term: &mut Terminal<I, O, E>,
) -> io::Result<Outcome>
where
    T: ApiTransport,
    S: SessionStore,
    I: BufRead,
    O: Write,
    E: Write,
{
    let auth = AuthService::new(client, term.app().backend());
    let result = match command {
        AccountCommand::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => term.prompt("Password")?,
            };
            match LoginCredentials::try_from_parts(&username, &password) {
                Ok(credentials) => auth.login(&credentials).await,
                Err(error) => Err(Error::validation(error.to_string())),
            }
        }
        AccountCommand::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let password = match password {
                Some(password) => password,
                None => term.prompt("Password")?,
            };
            let confirm_password = match confirm_password {
                Some(confirm) => confirm,
                None => term.prompt("Confirm password")?,
            };
            let form = RegistrationForm {
                username,
                email,
                password,
                confirm_password,
            };
            auth.register(&form).await
        }
        AccountCommand::Logout => auth.logout(),
        AccountCommand::Refresh => auth.refresh().await.map(|()| Page::Index),
    };
    match result {
        Ok(page) => {
            term.navigate(&page)?;
            Ok(Outcome::Completed)
        }
        Err(error) => term.show_error(&error),
    }
}
