//! CLI module - Command-line interface for the supplier portal
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::Supplier;

/// Supplier Portal - image and CSV catalogue for supplier data
#[derive(Parser)]
#[command(name = "supplier-portal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Register a user; the password is read from stdin
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },

    /// Replace the image collection with a supplier's image folder
    ImportImages {
        #[arg(value_parser = parse_supplier)]
        supplier: Supplier,
    },

    /// Replace the CSV collection with a supplier's raw-data CSV
    ImportCsv {
        #[arg(value_parser = parse_supplier)]
        supplier: Supplier,
    },

    /// Delete every stored image
    ClearImages,

    /// Delete every stored CSV record
    ClearCsv,

    /// Show recent successful logins
    #[command(alias = "h")]
    History {
        /// Number of entries to show
        #[arg(default_value = "10")]
        limit: u64,
    },

    /// Print a supplier's clusters table
    Clusters {
        #[arg(value_parser = parse_supplier)]
        supplier: Supplier,
    },
}

fn parse_supplier(raw: &str) -> Result<Supplier, String> {
    raw.parse()
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::try_parse_from(["supplier-portal", "import-csv", "rosenberger"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::ImportCsv {
                supplier: Supplier::Rosenberger
            })
        ));
    }

    #[test]
    fn test_history_default_limit() {
        let cli = Cli::try_parse_from(["supplier-portal", "history"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::History { limit: 10 })));
    }

    #[test]
    fn test_unknown_supplier_is_rejected() {
        assert!(Cli::try_parse_from(["supplier-portal", "clusters", "acme"]).is_err());
    }
}
