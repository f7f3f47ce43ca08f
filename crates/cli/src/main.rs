//! Pisos Kermy CLI - scripted administration against the catalog backend.
//!
//! # Usage
//!
//! ```bash
//! # List admin accounts
//! catalogo-cli admins list
//!
//! # Create an admin (password read from stdin)
//! echo 's3cretpass' | catalogo-cli admins create -e ana@pisoskermy.com -n "Ana"
//!
//! # Replace the About text from a file
//! catalogo-cli content set --file nosotros.txt
//!
//! # Second page of the audit log
//! catalogo-cli audit --page 2
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Backend base URL
//! - `CATALOG_ADMIN_EMAIL` / `CATALOG_ADMIN_PASSWORD` - Credentials used to
//!   log in for each invocation

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use catalogo_core::{ABOUT_US_KEY, AdminId};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "catalogo-cli")]
#[command(author, version, about = "Pisos Kermy catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
    /// Read or replace editable site content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Show the audit log
    Audit {
        /// Page number (50 entries per page)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Product catalog reports
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum AdminsAction {
    /// List every admin account
    List,
    /// Create an admin; the password is read from stdin
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,
    },
    /// Replace an admin's password; the new password is read from stdin
    Password {
        /// Admin id
        id: AdminId,
    },
    /// Activate or deactivate an admin
    Toggle {
        /// Admin id
        id: AdminId,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Print a content block
    Get {
        /// Content key
        #[arg(short, long, default_value = ABOUT_US_KEY)]
        key: String,
    },
    /// Replace a content block with a file, or stdin when no file is given
    Set {
        /// Content key
        #[arg(short, long, default_value = ABOUT_US_KEY)]
        key: String,

        /// File holding the new text
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Count products, categories, tags and providers
    Summary,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "catalogo_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let config = commands::CliConfig::from_env()?;
    let conn = commands::Connection::open(&config).await?;

    match cli.command {
        Commands::Admins { action } => match action {
            AdminsAction::List => commands::admins::list(&conn).await?,
            AdminsAction::Create { email, name } => {
                commands::admins::create(&conn, &email, &name).await?;
            }
            AdminsAction::Password { id } => commands::admins::change_password(&conn, id).await?,
            AdminsAction::Toggle { id } => commands::admins::toggle(&conn, id).await?,
        },
        Commands::Content { action } => match action {
            ContentAction::Get { key } => commands::content::get(&conn, &key).await?,
            ContentAction::Set { key, file } => {
                commands::content::set(&conn, &key, file.as_deref()).await?;
            }
        },
        Commands::Audit { page } => commands::audit::show(&conn, page).await?,
        Commands::Products {
            action: ProductsAction::Summary,
        } => commands::products::summary(&conn).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_content_key_defaults_to_about_us() {
        let cli = Cli::try_parse_from(["catalogo-cli", "content", "get"]).unwrap();
        match cli.command {
            Commands::Content {
                action: ContentAction::Get { key },
            } => assert_eq!(key, "about_us"),
            _ => panic!("expected content get"),
        }
    }

    #[test]
    fn test_toggle_parses_admin_id() {
        let cli = Cli::try_parse_from(["catalogo-cli", "admins", "toggle", "7"]).unwrap();
        match cli.command {
            Commands::Admins {
                action: AdminsAction::Toggle { id },
            } => assert_eq!(id, AdminId::new(7)),
            _ => panic!("expected admins toggle"),
        }
    }

    #[test]
    fn test_audit_page_defaults_to_first() {
        let cli = Cli::try_parse_from(["catalogo-cli", "audit"]).unwrap();
        assert!(matches!(cli.command, Commands::Audit { page: 1 }));
    }
}
