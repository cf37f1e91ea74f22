//! Info command - show metadata for a stored file.

use clap::Args;
use console::style;

use fetchstore::app::{AppConfig, FetchStoreApp};
use fetchstore::download::DownloadTracker;

use crate::error::CliError;

/// Arguments for the info command.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// File URI, absolute path, or name inside the document directory
    pub target: String,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the info command.
///
/// Absence is reported, not treated as an error: the command exits zero
/// either way.
pub fn run(args: InfoArgs, config: AppConfig) -> Result<(), CliError> {
    let app = FetchStoreApp::start_sync(config)?;
    let tracker = app.tracker();

    let target = resolve_target(&tracker, &args.target);
    let info = app.runtime_handle().block_on(tracker.file_info(&target));

    if args.json {
        let rendered = serde_json::to_string_pretty(&info)
            .map_err(|e| CliError::Render(e.to_string()))?;
        println!("{}", rendered);
    } else if info.exists {
        println!("{}", style(&info.uri).bold());
        println!("  exists:    yes");
        println!(
            "  directory: {}",
            if info.is_directory { "yes" } else { "no" }
        );
        if let Some(size) = info.size {
            println!("  size:      {} bytes", size);
        }
    } else {
        println!("{}", style(&info.uri).bold());
        println!("  exists:    no");
    }

    app.shutdown();
    Ok(())
}

/// Interpret bare names relative to the document directory; URIs and
/// absolute paths pass through unchanged.
fn resolve_target(tracker: &DownloadTracker, target: &str) -> String {
    if target.contains("://") || target.starts_with('/') {
        target.to_string()
    } else {
        tracker
            .document_dir()
            .join(target)
            .to_string_lossy()
            .into_owned()
    }
}
