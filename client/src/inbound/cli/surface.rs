//! Error surface and navigation for the terminal.
//!
//! Output goes to the `out` writer, error messages to `err`. A failure that
//! demands a redirect is shown as navigation to the login page instead of a
//! message.

use std::io::{self, BufRead, Write};

use crate::domain::{Error, Page};

/// Which front end is running; decides the command each page maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    /// `expenses` binary.
    Expenses,
    /// `blog` binary.
    Blog,
}

impl App {
    /// Binary name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Expenses => "expenses",
            Self::Blog => "blog",
        }
    }

    /// Command that shows `page`.
    ///
    /// # Examples
    /// ```
    /// use client::domain::Page;
    /// use client::inbound::cli::App;
    ///
    /// assert_eq!(App::Expenses.command_for(&Page::Edit { id: 4 }), "expenses edit 4");
    /// ```
    pub fn command_for(self, page: &Page) -> String {
        let name = self.name();
        match (self, page) {
            (_, Page::Login) => format!("{name} login"),
            (Self::Expenses, Page::Index) => format!("{name} dashboard"),
            (Self::Blog, Page::Index) => format!("{name} list"),
            (_, Page::Edit { id }) => format!("{name} edit {id}"),
            (_, Page::Detail { slug }) => format!("{name} show {slug}"),
        }
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The use case completed.
    Completed,
    /// The use case failed and the failure was surfaced.
    Failed,
}

/// Terminal attached to an input and two output streams.
pub struct Terminal<I, O, E> {
    app: App,
    input: I,
    out: O,
    err: E,
}

impl<I, O, E> Terminal<I, O, E>
where
    I: BufRead,
    O: Write,
    E: Write,
{
    /// Wrap the given streams.
    pub fn new(app: App, input: I, out: O, err: E) -> Self {
        Self {
            app,
            input,
            out,
            err,
        }
    }

    /// Front end this terminal belongs to.
    pub fn app(&self) -> App {
        self.app
    }

    /// Write rendered output.
    pub fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Announce the next page and the command that opens it.
    pub fn navigate(&mut self, page: &Page) -> io::Result<()> {
        writeln!(
            self.out,
            "-> {} (run `{}`)",
            page.href(),
            self.app.command_for(page)
        )
    }

    /// Surface a failure: redirect when the session is gone, otherwise
    /// write the message to the error stream.
    pub fn show_error(&mut self, error: &Error) -> io::Result<Outcome> {
        tracing::debug!(code = ?error.code(), %error, "use case failed");
        if let Some(page) = error.redirect() {
            self.navigate(&page)?;
        } else {
            writeln!(self.err, "Error: {}", error.user_message())?;
        }
        Ok(Outcome::Failed)
    }

    /// Show a partial failure without ending the command.
    pub fn warn(&mut self, error: &Error) -> io::Result<()> {
        writeln!(self.err, "Error: {}", error.user_message())
    }

    /// Ask a yes/no question; anything but `y`/`yes` declines.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.out, "{question} [y/N] ")?;
        self.out.flush()?;
        let answer = self.read_line()?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Ask for a value, e.g. a password not given on the command line.
    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        self.read_line()
    }

    /// Consume the terminal and return its streams.
    pub fn into_parts(self) -> (I, O, E) {
        (self.input, self.out, self.err)
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}
