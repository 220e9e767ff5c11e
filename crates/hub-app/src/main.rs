use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hub_core::Language;
use tracing_subscriber::EnvFilter;

mod commands;
pub mod state;

use self::state::AppState;

#[derive(Parser)]
#[command(name = "hub", about = "Japanese and English dictionary lookups with saved word lists")]
struct Cli {
    /// JSON config file; environment defaults apply when it is missing
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a word and print the normalized results as JSON
    Search {
        query: String,
        /// Force the dictionary direction instead of detecting it
        #[arg(long, value_parser = parse_language)]
        lang: Option<Language>,
        /// User id or name
        #[arg(long)]
        user: Option<String>,
        /// Push the query to the user's history
        #[arg(long)]
        record: bool,
    },
    /// Manage user profiles
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Inspect or replace a user's saved lists and history
    State {
        #[command(subcommand)]
        command: StateCommand,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    List,
    Add { name: String },
    Delete { user: String },
}

#[derive(Subcommand)]
enum StateCommand {
    Show {
        #[arg(long)]
        user: Option<String>,
    },
    /// Sanitize and store the state document in FILE
    Save {
        file: PathBuf,
        #[arg(long)]
        user: Option<String>,
    },
}

fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| format!("unsupported language '{code}' (ja, en)"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = hub_config::Config::load(&cli.config)?;
    let state = AppState::new(config)?;

    match cli.command {
        Command::Search {
            query,
            lang,
            user,
            record,
        } => commands::search::run(&state, &query, lang, user.as_deref(), record).await,
        Command::Users { command } => match command {
            UsersCommand::List => commands::users::list(&state),
            UsersCommand::Add { name } => commands::users::add(&state, &name),
            UsersCommand::Delete { user } => commands::users::delete(&state, &user),
        },
        Command::State { command } => match command {
            StateCommand::Show { user } => commands::state::show(&state, user.as_deref()),
            StateCommand::Save { file, user } => {
                commands::state::save(&state, &file, user.as_deref())
            }
        },
    }
}
