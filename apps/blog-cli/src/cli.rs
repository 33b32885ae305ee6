//! Command definitions. Each subcommand corresponds to one sidebar entry
//! (plus `whoami` and `post`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use blog_client::presentation::{
    FieldErrors, Feed, Header, LoginForm, PostCard, Publish, Sidebar, SignupForm,
};
use blog_client::{BlogClient, ClientError, DEFAULT_API_URL, FileSessionStore};
use chrono::Local;
use clap::{Parser, Subcommand};

/// Command line options for the blog client.
#[derive(Debug, Parser)]
#[command(about = "Read and write the blog feed", version, author, long_about = None)]
pub struct Cli {
    /// Base URL of the blog API.
    #[arg(long, env = "BLOG_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Where the session (token triple) is stored.
    #[arg(long, env = "BLOG_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD")]
        password: String,
        /// Defaults to the password.
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD")]
        password: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show every post, newest first.
    Feed,
    /// Publish a post.
    Post {
        /// Post text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let session_file = self
            .session_file
            .unwrap_or_else(FileSessionStore::default_path);
        tracing::debug!(api = %self.api_url, session = %session_file.display(), "Starting");

        let client = BlogClient::new(
            self.api_url,
            Arc::new(FileSessionStore::new(session_file)),
        )?;

        match self.command {
            Command::Signup {
                username,
                email,
                password,
                password_confirmation,
            } => {
                let form = SignupForm {
                    username,
                    email,
                    password_confirmation: password_confirmation
                        .unwrap_or_else(|| password.clone()),
                    password,
                };
                check_form(form.validate())?;
                let user = client.signup(&form.to_request()).await.map_err(explain)?;
                println!("Welcome, {}! You are signed in.", display_name(&user));
            }
            Command::Login { email, password } => {
                let form = LoginForm { email, password };
                check_form(form.validate())?;
                let user = client
                    .login(&form.email, &form.password)
                    .await
                    .map_err(explain)?;
                println!("Signed in as {}.", display_name(&user));
            }
            Command::Logout => {
                let result = client.logout().await;
                println!("Signed out.");
                if let Err(e) = result {
                    eprintln!("warning: the server did not confirm sign-out: {e}");
                }
            }
            Command::Whoami => match client.validate_token().await? {
                Some(user) => println!("{} <{}>", display_name(&user), user.email),
                None => println!("Not signed in."),
            },
            Command::Feed => {
                let mut feed = Feed::new();
                println!("{}", Header);
                println!("{}", Sidebar);
                println!();

                if let Err(e) = feed.refresh(&client).await {
                    let notice = feed.take_notice().unwrap_or_default();
                    bail!("{notice} {}", explain(e));
                }
                if feed.posts().is_empty() {
                    println!("No posts yet.");
                }
                for blog in feed.posts() {
                    println!("{}\n", PostCard::new(blog, &Local));
                }
            }
            Command::Post { content } => {
                let mut feed = Feed::new();
                match feed.publish(&client, &content.join(" ")).await {
                    Ok(Publish::Posted(blog)) => println!("{}", PostCard::new(&blog, &Local)),
                    Ok(Publish::RejectedBlank) => bail!("Nothing to post."),
                    Err(e) => {
                        let notice = feed.take_notice().unwrap_or_default();
                        bail!("{notice} {}", explain(e));
                    }
                }
            }
        }

        Ok(())
    }
}

fn display_name(user: &blog_shared::dto::UserResponse) -> String {
    match user.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => user.email.split('@').next().unwrap_or_default().to_string(),
    }
}

fn check_form(result: std::result::Result<(), FieldErrors>) -> Result<()> {
    if let Err(errors) = result {
        let lines: Vec<String> = errors
            .into_iter()
            .map(|(field, message)| format!("  {field}: {message}"))
            .collect();
        bail!("Please fix the following:\n{}", lines.join("\n"));
    }
    Ok(())
}

/// Add a next step to errors the user can act on.
fn explain(error: ClientError) -> anyhow::Error {
    match error {
        ClientError::Unauthorized => {
            anyhow::anyhow!("{error}. Run `blog-cli login` to sign in.")
        }
        ClientError::Network(_) => {
            anyhow::anyhow!("{error}. Is the API server running?")
        }
        other => other.into(),
    }
}
