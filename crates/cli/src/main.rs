//! Craft Bazaar CLI - store maintenance and admin accounts.
//!
//! # Usage
//!
//! ```bash
//! # Write the seed catalog to a fresh data directory
//! cb-cli store seed
//!
//! # Replace an existing store with the seed catalog
//! cb-cli store seed --force
//!
//! # Entity counts and id counters
//! cb-cli store stats
//!
//! # Integrity report (exits non-zero when issues are found)
//! cb-cli --data-dir /srv/bazaar store check
//!
//! # Create an admin account
//! CB_ADMIN_PASSWORD=... cb-cli admin create -n "Shop Owner" -e owner@example.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "cb-cli")]
#[command(author, version, about = "Craft Bazaar CLI tools")]
struct Cli {
    /// Directory holding `database.json` and `images/`
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and maintain the store file
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Write the seed catalog
    Seed {
        /// Overwrite an existing store file
        #[arg(long)]
        force: bool,
    },
    /// Show entity counts and id counters
    Stats,
    /// Report dangling references, duplicates and stale counters
    Check,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password (at least 8 characters)
        #[arg(short, long, env = "CB_ADMIN_PASSWORD", hide_env_values = true)]
        password: SecretString,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Store { action } => match action {
            StoreAction::Seed { force } => commands::store::seed(&data_dir, force).await?,
            StoreAction::Stats => commands::store::stats(&data_dir).await?,
            StoreAction::Check => commands::store::check(&data_dir).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                name,
                email,
                password,
            } => {
                commands::admin::create_admin(&data_dir, &name, &email, &password).await?;
            }
        },
    }
    Ok(())
}
