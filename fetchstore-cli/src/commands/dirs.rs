//! Dirs command - print the resolved storage directories.

use clap::Args;

use fetchstore::app::{AppConfig, FetchStoreApp};

use crate::error::CliError;

/// Arguments for the dirs command.
#[derive(Debug, Args)]
pub struct DirsArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the dirs command.
///
/// Starting the app creates the document and cache roots, so the printed
/// directories are guaranteed to exist.
pub fn run(args: DirsArgs, config: AppConfig) -> Result<(), CliError> {
    let app = FetchStoreApp::start_sync(config)?;
    let storage = app.storage();

    if args.json {
        let payload = serde_json::json!({
            "document_dir": storage.document_dir().display().to_string(),
            "cache_dir": storage.cache_dir().display().to_string(),
            "bundle_dir": storage.bundle_dir().map(|p| p.display().to_string()),
        });
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::Render(e.to_string()))?;
        println!("{}", rendered);
    } else {
        println!("documents: {}", storage.document_dir().display());
        println!("cache:     {}", storage.cache_dir().display());
        match storage.bundle_dir() {
            Some(dir) => println!("bundle:    {}", dir.display()),
            None => println!("bundle:    (none)"),
        }
    }

    app.shutdown();
    Ok(())
}
