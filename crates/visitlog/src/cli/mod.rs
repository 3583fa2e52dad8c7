//! CLI command definitions.

pub mod demo;

use clap::{Parser, Subcommand, ValueEnum};

use crate::storage::StoreKind;

/// Record and page through visits over a partitioned key-value store.
#[derive(Debug, Parser)]
#[command(name = "visitlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage backend.
    #[arg(long, env = "VISITLOG_STORE", default_value = "memory")]
    pub store: StoreKind,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the scripted walkthrough: record, count, delete and paginate.
    Demo,
    /// Show how many times a visitor has been to a location.
    Count {
        /// Visitor name.
        visitor: String,
        /// Location name.
        location: String,
    },
    /// Record one visit.
    Record {
        /// Visitor name.
        visitor: String,
        /// Location name.
        location: String,
    },
    /// Forget every visit of a visitor to a location.
    Delete {
        /// Visitor name.
        visitor: String,
        /// Location name.
        location: String,
    },
    /// List the locations a visitor has been to, one page at a time.
    Locations {
        /// Visitor name.
        visitor: String,
        /// Last location of the previous page.
        #[arg(long)]
        after: Option<String>,
        /// Page size (defaults to PAGE_LIMIT).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the visitors of a location, one page at a time.
    Visitors {
        /// Location name.
        location: String,
        /// Last visitor of the previous page.
        #[arg(long)]
        after: Option<String>,
        /// Page size (defaults to PAGE_LIMIT).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fetch visitor profiles in one batch.
    Profiles {
        /// Visitor names; duplicates are fetched once.
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paging_arguments() {
        let cli = Cli::try_parse_from([
            "visitlog", "--format", "json", "visitors", "italy", "--after", "elliot", "--limit",
            "3",
        ])
        .unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.store, StoreKind::Memory);
        match cli.command {
            Commands::Visitors {
                location,
                after,
                limit,
            } => {
                assert_eq!(location, "italy");
                assert_eq!(after.as_deref(), Some("elliot"));
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_profiles_requires_a_name() {
        assert!(Cli::try_parse_from(["visitlog", "profiles"]).is_err());
    }

    #[test]
    fn test_store_selection() {
        let cli = Cli::try_parse_from(["visitlog", "--store", "dynamodb", "demo"]).unwrap();
        assert_eq!(cli.store, StoreKind::Dynamodb);
    }
}
