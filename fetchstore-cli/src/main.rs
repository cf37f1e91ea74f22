//! FetchStore CLI - Command-line interface
//!
//! This binary provides a command-line interface to the fetchstore
//! library: tracked downloads into a managed local file store.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

use fetchstore::app::AppConfig;
use fetchstore::logging::{self, LogConfig};

use commands::dirs::DirsArgs;
use commands::fetch::FetchArgs;
use commands::info::InfoArgs;
use commands::store::StoreAction;
use error::CliError;

/// Tracked downloads into a managed local file store.
#[derive(Debug, Parser)]
#[command(name = "fetchstore", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Override the document directory
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download a file into the document directory
    Fetch(FetchArgs),
    /// Show metadata for a stored file
    Info(InfoArgs),
    /// Manage stored text files
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Print the resolved storage directories
    Dirs(DirsArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_document_dir(dir);
    }
    if let Some(dir) = cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    // Keep the guard alive so file logging flushes on exit.
    let _log_guard = logging::init(&log_config(&config, cli.verbose, cli.log_file))?;
    debug!(app_name = %config.app_name, "Logging initialized");

    match cli.command {
        Command::Fetch(args) => commands::fetch::run(args, config),
        Command::Info(args) => commands::info::run(args, config),
        Command::Store { action } => commands::store::run(action, config),
        Command::Dirs(args) => commands::dirs::run(args, config),
    }
}

/// Build the log configuration from config file values and CLI flags.
///
/// CLI arguments override config file values when specified.
fn log_config(config: &AppConfig, verbose: u8, log_file: Option<PathBuf>) -> LogConfig {
    let mut log = LogConfig::new();

    let filter = match verbose {
        0 => config.log_filter.clone(),
        1 => Some("fetchstore=debug".to_string()),
        _ => Some("fetchstore=trace".to_string()),
    };
    if let Some(filter) = filter {
        log = log.with_filter(filter);
    }
    if let Some(file) = log_file.or_else(|| config.log_file.clone()) {
        log = log.with_file(file);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "fetchstore",
            "fetch",
            "https://example.com/a.pdf",
            "--no-cache",
        ])
        .unwrap();

        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.url, "https://example.com/a.pdf");
                assert!(args.no_cache);
                assert!(args.name.is_none());
            }
            _ => panic!("expected the fetch command"),
        }
    }

    #[test]
    fn test_parse_store_remove_force() {
        let cli = Cli::try_parse_from(["fetchstore", "store", "remove", "old.txt", "--force"])
            .unwrap();

        match cli.command {
            Command::Store {
                action: StoreAction::Remove { name, force },
            } => {
                assert_eq!(name, "old.txt");
                assert!(force);
            }
            _ => panic!("expected the store remove command"),
        }
    }

    #[test]
    fn test_verbose_maps_to_filters() {
        let config = AppConfig::default();
        assert_eq!(log_config(&config, 0, None).filter, None);
        assert_eq!(
            log_config(&config, 1, None).filter.as_deref(),
            Some("fetchstore=debug")
        );
        assert_eq!(
            log_config(&config, 3, None).filter.as_deref(),
            Some("fetchstore=trace")
        );
    }

    #[test]
    fn test_cli_log_file_overrides_config() {
        let config = AppConfig::default().with_log_file("/from/config.log");
        let log = log_config(&config, 0, Some(PathBuf::from("/from/cli.log")));
        assert_eq!(log.file, Some(PathBuf::from("/from/cli.log")));

        let log = log_config(&config, 0, None);
        assert_eq!(log.file, Some(PathBuf::from("/from/config.log")));
    }
}
