//! `blog` subcommands and their dispatch.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use url::Url;

use crate::domain::ports::{ApiTransport, SessionStore};
use crate::domain::{ApiClient, BlogService, ClientResult, Page, PostFilter, PostForm, PostSlug};

use super::account::{self, AccountCommand, ConnectionArgs};
use super::{Outcome, Terminal, render};

/// Blog client.
#[derive(Debug, Parser)]
#[command(name = "blog", about = "Read and publish posts on the blog API", version)]
pub struct BlogCli {
    /// Connection overrides.
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Command to run.
    #[command(subcommand)]
    pub command: BlogCommand,
}

/// Blog subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum BlogCommand {
    /// Account commands.
    #[command(flatten)]
    Account(AccountCommand),
    /// List posts.
    List {
        /// Category name filter.
        #[arg(long)]
        category: Option<String>,
        /// Tag name filter.
        #[arg(long)]
        tag: Option<String>,
        /// Follow a pagination link printed by a previous listing.
        #[arg(long, value_name = "URL", conflicts_with_all = ["category", "tag"])]
        page: Option<Url>,
    },
    /// Publish a post.
    Create {
        /// Headline.
        #[arg(long, default_value_t)]
        title: String,
        /// Markdown body.
        #[arg(long, default_value_t)]
        content: String,
        /// Category name.
        #[arg(long, default_value_t)]
        category: String,
        /// Comma-separated tags.
        #[arg(long, default_value_t)]
        tags: String,
    },
    /// Show a post; its author also sees the edit and delete commands.
    #[command(alias = "edit")]
    Show {
        /// Post slug.
        slug: PostSlug,
    },
    /// Change a post's title and content.
    Update {
        /// Post slug.
        slug: PostSlug,
        /// New headline.
        #[arg(long, default_value_t)]
        title: String,
        /// New markdown body.
        #[arg(long, default_value_t)]
        content: String,
    },
    /// Delete a post.
    Delete {
        /// Post slug.
        slug: PostSlug,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Run a `blog` subcommand.
///
/// # Errors
///
/// Returns an error only when the terminal cannot be written or read.
pub async fn run<T, S, I, O, E>(
    client: ApiClient<T, S>,
    command: BlogCommand,
    term: &mut Terminal<I, O, E>,
) -> io::Result<Outcome>
where
    T: ApiTransport,
    S: SessionStore,
    I: BufRead,
    O: Write,
    E: Write,
{
    let service = BlogService::new(client.clone());
    let result = match command {
        BlogCommand::Account(command) => return account::run(client, command, term).await,
        BlogCommand::List {
            category,
            tag,
            page,
        } => {
            let filter = PostFilter { category, tag };
            match service.list(&filter, page).await {
                Ok(posts) => {
                    term.show(&render::posts(&posts))?;
                    return Ok(Outcome::Completed);
                }
                Err(error) => Err(error),
            }
        }
        BlogCommand::Create {
            title,
            content,
            category,
            tags,
        } => {
            let form = PostForm {
                title,
                content,
                category,
                tags,
            };
            service.create(&form).await
        }
        BlogCommand::Show { slug } => match service.detail(&slug).await {
            Ok(view) => {
                term.show(&render::post_detail(&view))?;
                return Ok(Outcome::Completed);
            }
            Err(error) => Err(error),
        },
        BlogCommand::Update {
            slug,
            title,
            content,
        } => service.update(&slug, &title, &content).await,
        BlogCommand::Delete { slug, yes } => {
            if !yes && !term.confirm("Are you sure you want to delete this post?")? {
                term.show("Cancelled.")?;
                return Ok(Outcome::Completed);
            }
            service.delete(&slug).await
        }
    };
    finish(term, result)
}

fn finish<I, O, E>(
    term: &mut Terminal<I, O, E>,
    result: ClientResult<Page>,
) -> io::Result<Outcome>
where
    I: BufRead,
    O: Write,
    E: Write,
{
    match result {
        Ok(page) => {
            term.navigate(&page)?;
            Ok(Outcome::Completed)
        }
        Err(error) => term.show_error(&error),
    }
}
