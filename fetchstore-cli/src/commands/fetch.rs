//! Fetch command - download a file into the document directory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use fetchstore::app::{AppConfig, FetchStoreApp};
use fetchstore::download::{DownloadTracker, FALLBACK_ERROR_MESSAGE};

use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Source URL to download
    pub url: String,

    /// Destination file name (defaults to the last segment of the URL)
    pub name: Option<String>,

    /// Always download from scratch, ignoring bytes already on disk
    #[arg(long)]
    pub no_cache: bool,

    /// Print the outcome as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Suppress the progress bar and summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the fetch command.
pub fn run(args: FetchArgs, mut config: AppConfig) -> Result<(), CliError> {
    if args.no_cache {
        config.transfer.cache_partial = false;
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => derive_name(&args.url)?,
    };

    let app = FetchStoreApp::start_sync(config)?;
    let tracker = app.tracker();

    let reporter = if args.json || args.quiet {
        None
    } else {
        Some(ProgressReporter::spawn(Arc::clone(&tracker), &name))
    };

    let result = app
        .runtime_handle()
        .block_on(tracker.download(&args.url, &name));

    let state = tracker.snapshot();
    if let Some(reporter) = reporter {
        reporter.finish(state.progress);
    }

    if args.json {
        let payload = serde_json::json!({
            "result": result,
            "state": state,
        });
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::Render(e.to_string()))?;
        println!("{}", rendered);
    }

    match result.uri {
        Some(uri) => {
            if !args.json && !args.quiet {
                println!("{} {}", style("Saved").green().bold(), uri);
                if let Some(mime) = &result.mime_type {
                    println!("  type: {}", mime);
                }
                if let Some(size) = state.size {
                    println!("  size: {} bytes", size);
                }
            }
            app.shutdown();
            Ok(())
        }
        None => {
            let message = state
                .error
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            app.shutdown();
            Err(CliError::Download(message))
        }
    }
}

/// Derive a destination file name from the URL's last path segment.
fn derive_name(url: &str) -> Result<String, CliError> {
    let end = url
        .find(|c| c == '?' || c == '#')
        .unwrap_or(url.len());
    let candidate = url[..end].rsplit('/').next().unwrap_or("");

    if candidate.is_empty() || candidate.contains(':') {
        return Err(CliError::Config(format!(
            "cannot derive a file name from {}, pass one explicitly",
            url
        )));
    }
    Ok(candidate.to_string())
}

/// Renders the tracker's observable state as a terminal progress bar.
///
/// A background thread polls the snapshot while the download blocks the
/// main thread on the app runtime.
struct ProgressReporter {
    bar: ProgressBar,
    stop: Arc<AtomicBool>,
    poller: thread::JoinHandle<()>,
}

impl ProgressReporter {
    fn spawn(tracker: Arc<DownloadTracker>, name: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .expect("Failed to build progress template")
                .progress_chars("#>-"),
        );
        bar.set_message(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let stop = Arc::new(AtomicBool::new(false));
        let poller = thread::spawn({
            let bar = bar.clone();
            let stop = Arc::clone(&stop);
            move || {
                while !stop.load(Ordering::Relaxed) {
                    bar.set_position(tracker.snapshot().progress as u64);
                    thread::sleep(Duration::from_millis(100));
                }
            }
        });

        ProgressReporter { bar, stop, poller }
    }

    fn finish(self, final_progress: u8) {
        self.stop.store(true, Ordering::Relaxed);
        self.poller.join().ok();
        self.bar.set_position(final_progress as u64);
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_from_path() {
        assert_eq!(
            derive_name("https://example.com/files/report.pdf").unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn test_derive_name_strips_query_and_fragment() {
        assert_eq!(
            derive_name("https://example.com/report.pdf?token=abc#page2").unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn test_derive_name_rejects_trailing_slash() {
        let err = derive_name("https://example.com/files/").unwrap_err();
        assert!(err.to_string().contains("pass one explicitly"));
    }

    #[test]
    fn test_derive_name_rejects_bare_scheme() {
        assert!(derive_name("https://").is_err());
    }
}
