//! `carehub` command line: serve the dashboard, check configuration and
//! inspect the fixture data.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::ConfigSource;
use commands::fixtures::{Entity, FixtureFilters};

#[derive(Parser, Debug)]
#[command(name = "carehub", version, about = "CareHub hospital dashboard")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web dashboard.
    Serve {
        /// Configuration file (falls back to $CAREHUB_CONFIG, then carehub.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override dashboard.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate the configuration and print a summary.
    Check {
        /// Configuration file (falls back to $CAREHUB_CONFIG, then carehub.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print fixture tables, filtered like the dashboard lists.
    Fixtures {
        /// Table to print; omit for a count of every table
        #[arg(short, long, value_enum)]
        entity: Option<Entity>,

        #[command(flatten)]
        filters: FixtureFilters,

        /// Print JSON instead of text rows
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve { config, port } => {
            let config = ConfigSource::from_env(config).load()?;
            init_logging(&config.logging.level);
            commands::serve::run(config, port).await?
        }
        Command::Check { config } => {
            init_logging("warn");
            commands::check::run(&ConfigSource::from_env(config))?
        }
        Command::Fixtures {
            entity,
            filters,
            json,
        } => {
            init_logging("warn");
            commands::fixtures::run(entity, &filters, json)?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fixture_filters() {
        let cli = Cli::parse_from([
            "carehub", "fixtures", "--entity", "rooms", "--type", "ICU", "--status", "Available",
        ]);
        match cli.cmd {
            Command::Fixtures { entity, filters, json } => {
                assert_eq!(entity, Some(Entity::Rooms));
                assert_eq!(filters.kind.as_deref(), Some("ICU"));
                assert_eq!(filters.status.as_deref(), Some("Available"));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn serve_port_override() {
        let cli = Cli::parse_from(["carehub", "serve", "--port", "9000"]);
        assert!(matches!(cli.cmd, Command::Serve { config: None, port: Some(9000) }));
    }
}
