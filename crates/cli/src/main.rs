//! Homacuk CLI - admin management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the permission table
//! homacuk-cli permissions
//! homacuk-cli permissions --role editor
//!
//! # Show the newest events of a persisted audit log
//! homacuk-cli audit --file audit.jsonl --limit 20
//!
//! # Validate an account file before pointing ADMIN_ACCOUNTS_FILE at it
//! homacuk-cli accounts check --file accounts.yaml
//! ```
//!
//! # Commands
//!
//! - `permissions` - Print feature/action permissions by role
//! - `audit` - Print audit events, newest first
//! - `accounts check` - Validate an admin account file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "homacuk-cli")]
#[command(author, version, about = "Homacuk admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the permission table
    Permissions {
        /// Only show what this role may use (`admin`, `editor`)
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Print events from a persisted audit log, newest first
    Audit {
        /// JSON Lines audit file (as set by `ADMIN_AUDIT_LOG_PATH`)
        #[arg(short, long, env = "ADMIN_AUDIT_LOG_PATH")]
        file: PathBuf,

        /// Maximum number of events to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Manage admin account files
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },
}

#[derive(Subcommand)]
enum AccountsAction {
    /// Validate an account file
    Check {
        /// YAML account file (as set by `ADMIN_ACCOUNTS_FILE`)
        #[arg(short, long, env = "ADMIN_ACCOUNTS_FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Permissions { role } => commands::permissions::show(role.as_deref())?,
        Commands::Audit { file, limit } => commands::audit::show(&file, limit).await?,
        Commands::Accounts { action } => match action {
            AccountsAction::Check { file } => commands::accounts::check(&file)?,
        },
    }
    Ok(())
}
