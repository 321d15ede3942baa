use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use services::api::ApiConfig;
use services::{AppServices, AuthSession, Clock, Notification, Notifier, UserContext};
use study_core::model::{User, UserId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "study")]
#[command(author, version, about = "Quizzes, flashcards and notes from the terminal", long_about = None)]
struct Cli {
    /// Use the study API instead of the bundled catalog
    #[arg(long, global = true)]
    remote: bool,

    /// Bearer token for the study API
    #[arg(long, global = true, env = "STUDY_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Account to act as
    #[arg(long, global = true, env = "STUDY_USER_ID")]
    user_id: Option<u64>,

    /// Defaults to `shell`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run several commands against one session (quiz results and uploads are kept)
    Shell,
    /// List available quizzes
    Quizzes,
    /// Take a quiz interactively
    Take {
        /// Id of the quiz to take
        quiz_id: u64,
    },
    /// Review flashcards interactively
    Flashcards {
        /// Start in random order
        #[arg(long)]
        shuffle: bool,
    },
    /// List your notes
    Notes {
        /// Only show notes matching this text
        #[arg(short, long, default_value = "")]
        query: String,
        /// Show every note instead of the latest three
        #[arg(long)]
        all: bool,
    },
    /// Upload files to your notes
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show your study summary
    Dashboard,
}

/// One line typed at the shell prompt.
#[derive(Parser)]
#[command(name = "study", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

/// Prints notifications as one-line toasts.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("» {} {}", notification.title(), notification.description());
    }
}

async fn build_services(cli: &Cli) -> Result<AppServices> {
    let clock = Clock::system();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    if cli.remote {
        let token = cli
            .token
            .as_deref()
            .context("--remote needs --token or STUDY_API_TOKEN")?;
        let user_id = cli
            .user_id
            .map(UserId::new)
            .context("--remote needs --user-id or STUDY_USER_ID")?;
        let config = ApiConfig::from_env()?;
        tracing::info!(base_url = %config.base_url(), "using remote API");
        return Ok(AppServices::remote(config, clock, notifier, token, user_id).await?);
    }

    Ok(AppServices::offline(clock, notifier, demo_context(cli.user_id))?)
}

fn demo_context(user_id: Option<u64>) -> UserContext {
    let demo = User::new(
        UserId::new(user_id.unwrap_or(1)),
        Some("Alex Johnson".into()),
        "alex",
        "alex@example.com",
    );
    UserContext::with_session(AuthSession::new("offline", demo))
}

async fn run<R>(app: &AppServices, command: Commands, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    match command {
        Commands::Shell => bail!("already in the shell"),
        Commands::Quizzes => commands::list_quizzes(app).await,
        Commands::Take { quiz_id } => commands::take_quiz(app, quiz_id, lines).await,
        Commands::Flashcards { shuffle } => commands::review_flashcards(app, shuffle, lines).await,
        Commands::Notes { query, all } => commands::list_notes(app, &query, all).await,
        Commands::Upload { files } => commands::upload(app, &files).await,
        Commands::Dashboard => commands::dashboard(app).await,
    }
}

/// Reads commands until `exit` or end of input. Failed commands are reported
/// and the shell carries on.
async fn shell<R>(app: &AppServices, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let stats = app.dashboard().stats(app.context()).await?;
    println!("{} Type 'help' for commands, 'exit' to leave.", stats.greeting);

    loop {
        print!("study> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["exit" | "quit"] => break,
            _ => {}
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                err.print()?;
                continue;
            }
        };
        if let Err(err) = run(app, command, lines).await {
            println!("error: {err:#}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study=info,services=info,storage=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let app = build_services(&cli).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell(&app, &mut lines).await,
        command => run(&app, command, &mut lines).await,
    }
}
