//! Store management commands for text files in the document directory.

use clap::Subcommand;
use console::style;
use dialoguer::Confirm;

use fetchstore::app::{AppConfig, FetchStoreApp};

use crate::error::CliError;

/// Store action subcommands.
#[derive(Debug, Subcommand)]
pub enum StoreAction {
    /// Print a stored text file
    Read {
        /// File name inside the document directory
        name: String,
    },
    /// Write a text file into the document directory
    Write {
        /// File name inside the document directory
        name: String,
        /// Text contents to store
        contents: String,
    },
    /// Remove a stored file or directory
    Remove {
        /// File name inside the document directory
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Run a store subcommand.
pub fn run(action: StoreAction, config: AppConfig) -> Result<(), CliError> {
    let app = FetchStoreApp::start_sync(config)?;
    let tracker = app.tracker();
    let handle = app.runtime_handle();

    let outcome = match action {
        StoreAction::Read { name } => {
            let path = tracker.document_dir().join(&name);
            let contents = handle.block_on(tracker.read_text(&path))?;
            print!("{}", contents);
            Ok(())
        }
        StoreAction::Write { name, contents } => {
            let path = tracker.document_dir().join(&name);
            handle.block_on(tracker.write_text(&path, &contents))?;
            println!("{} {}", style("Wrote").green().bold(), path.display());
            Ok(())
        }
        StoreAction::Remove { name, force } => {
            let path = tracker.document_dir().join(&name);
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove {}?", path.display()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Aborted.");
                    app.shutdown();
                    return Ok(());
                }
            }
            if handle.block_on(tracker.delete(&path))? {
                println!("{} {}", style("Removed").green().bold(), path.display());
            } else {
                println!("Nothing to remove at {}", path.display());
            }
            Ok(())
        }
    };

    app.shutdown();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig::new("fetchstore-test")
            .with_document_dir(dir.join("documents"))
            .with_cache_dir(dir.join("cache"))
    }

    #[test]
    fn test_write_then_remove_on_disk() {
        let tmp = tempdir().unwrap();

        run(
            StoreAction::Write {
                name: "note.txt".to_string(),
                contents: "remember the milk".to_string(),
            },
            config_in(tmp.path()),
        )
        .unwrap();

        let stored = tmp.path().join("documents").join("note.txt");
        assert_eq!(
            std::fs::read_to_string(&stored).unwrap(),
            "remember the milk"
        );

        // --force skips the prompt, which tests cannot answer.
        run(
            StoreAction::Remove {
                name: "note.txt".to_string(),
                force: true,
            },
            config_in(tmp.path()),
        )
        .unwrap();
        assert!(!stored.exists());
    }

    #[test]
    fn test_remove_missing_file_succeeds() {
        let tmp = tempdir().unwrap();

        run(
            StoreAction::Remove {
                name: "never-existed.txt".to_string(),
                force: true,
            },
            config_in(tmp.path()),
        )
        .unwrap();
    }

    #[test]
    fn test_read_missing_file_is_storage_error() {
        let tmp = tempdir().unwrap();

        let err = run(
            StoreAction::Read {
                name: "ghost.txt".to_string(),
            },
            config_in(tmp.path()),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Storage(_)));
    }
}
