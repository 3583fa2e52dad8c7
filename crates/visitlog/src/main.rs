mod cli;
mod config;
mod output;
mod storage;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitlog_core::visits::{Visit, VisitKey, VisitRepository, VisitorRepository};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::output::{format_output, pretty};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visitlog=debug,visitlog_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, store = ?cli.store, "Loaded configuration");

    let store = storage::connect(cli.store, &config).await?;
    let visits =
        VisitRepository::new(store.clone(), config.tables.clone()).with_page_limit(config.page_limit);
    let visitors = VisitorRepository::new(store, config.tables.clone());

    execute(cli.command, cli.format, &visits, &visitors).await
}

async fn execute(
    command: Commands,
    format: OutputFormat,
    visits: &VisitRepository,
    visitors: &VisitorRepository,
) -> Result<()> {
    match command {
        Commands::Demo => cli::demo::run(visits, visitors).await?,
        Commands::Count { visitor, location } => {
            let count = visits.get_count(&visitor, &location).await?;
            let visit = Visit::new(visitor, location).with_count(count);
            match format {
                OutputFormat::Json => println!("{}", format_output(&visit, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_count(&visit)),
            }
        }
        Commands::Record { visitor, location } => {
            visits.record(&visitor, &location).await?;
            let count = visits.get_count(&visitor, &location).await?;
            let visit = Visit::new(visitor, location).with_count(count);
            match format {
                OutputFormat::Json => println!("{}", format_output(&visit, format)),
                OutputFormat::Pretty => {
                    println!("Recorded: {}", pretty::format_count(&visit))
                }
            }
        }
        Commands::Delete { visitor, location } => {
            visits.delete(&visitor, &location).await?;
            let key = VisitKey::new(visitor, location);
            match format {
                OutputFormat::Json => println!("{}", format_output(&key, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_deleted(&key)),
            }
        }
        Commands::Locations {
            visitor,
            after,
            limit,
        } => {
            let page = visits
                .get_locations_visited(&visitor, after.as_deref(), limit)
                .await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&page, format)),
                OutputFormat::Pretty => {
                    let title = format!("LOCATIONS VISITED BY {}", visitor.to_uppercase());
                    println!("{}", pretty::format_page(&title, &page))
                }
            }
        }
        Commands::Visitors {
            location,
            after,
            limit,
        } => {
            let page = visits
                .get_visitors(&location, after.as_deref(), limit)
                .await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&page, format)),
                OutputFormat::Pretty => {
                    let title = format!("VISITORS OF {}", location.to_uppercase());
                    println!("{}", pretty::format_page(&title, &page))
                }
            }
        }
        Commands::Profiles { names } => {
            let profiles = visitors.batch_get(&names).await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&profiles, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_visitors(&profiles)),
            }
        }
    }
    Ok(())
}
