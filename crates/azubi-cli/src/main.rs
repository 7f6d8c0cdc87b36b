use anyhow::Result;
use azubi_core::DeleteSelection;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "azubiheft")]
#[command(about = "Maintain your azubiheft.de training report book from the terminal", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/azubiheft/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, short, env = "AZUBIHEFT_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, short, env = "AZUBIHEFT_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, report whether the session is accepted, log out
    Status,
    /// Manage report subjects
    Subjects {
        #[command(subcommand)]
        action: SubjectsAction,
    },
    /// Write, read and delete daily report entries
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
enum SubjectsAction {
    /// List built-in and custom subjects
    List,
    /// Add a custom subject
    Add { name: String },
    /// Delete a custom subject by id
    Delete { id: String },
}

#[derive(Subcommand)]
enum ReportAction {
    /// Append an entry to a day
    Write {
        #[arg(long)]
        date: NaiveDate,
        /// Duration as HH:MM
        #[arg(long)]
        time: azubi_core::TimeSpent,
        /// Subject id, or a name to look up in the catalog
        #[arg(long)]
        subject: String,
        #[arg(long)]
        text: String,
    },
    /// Print the entries of a day
    Read {
        #[arg(long)]
        date: NaiveDate,
        /// Keep line breaks instead of collapsing whitespace
        #[arg(long)]
        formatted: bool,
    },
    /// Delete one entry (1-based) or all entries of a day
    Delete {
        #[arg(long)]
        date: NaiveDate,
        /// Entry number (1-based) or `all`
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        entry: Option<DeleteSelection>,
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut session = commands::Session::open(
        cli.config.as_deref(),
        cli.username.as_deref(),
        cli.password.as_deref(),
    )
    .await?;

    let result = match cli.command {
        Commands::Status => commands::status::run(&session).await,
        Commands::Subjects { action } => match action {
            SubjectsAction::List => commands::subjects::list(&session).await,
            SubjectsAction::Add { name } => commands::subjects::add(&mut session, &name).await,
            SubjectsAction::Delete { id } => commands::subjects::delete(&mut session, &id).await,
        },
        Commands::Report { action } => match action {
            ReportAction::Write {
                date,
                time,
                subject,
                text,
            } => commands::report::write(&mut session, date, time, &subject, &text).await,
            ReportAction::Read { date, formatted } => {
                commands::report::read(&session, date, formatted).await
            }
            ReportAction::Delete { date, entry, all } => {
                commands::report::delete(&mut session, date, entry, all).await
            }
        },
    };

    session.close().await;
    result
}
