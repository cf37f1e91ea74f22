//! Observable download state.
//!
//! A [`DownloadState`] is the record a front end polls while a transfer runs:
//! whether one is in flight, how far along it is, and what the last settled
//! outcome was. The tracker owns the live instance; everyone else sees
//! snapshots.

use serde::Serialize;

use super::progress;

/// Snapshot of the download lifecycle.
///
/// `file`, `size`, and `success` describe the most recent *successful*
/// download and survive later failures; `error` describes the most recent
/// failure and is cleared by the next success. `progress` always reflects
/// the latest progress callback, even across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadState {
    /// URI of the last successfully downloaded file.
    pub file: Option<String>,
    /// Most recent rounded completion percentage, 0 to 100.
    pub progress: u8,
    /// Whether a transfer is currently in flight.
    pub downloading: bool,
    /// Content-Length reported by the last success that carried one.
    pub size: Option<u64>,
    /// Message of the most recent failure.
    pub error: Option<String>,
    /// Latched true by the first successful download.
    pub success: bool,
}

impl DownloadState {
    /// The idle state nothing has happened in yet.
    pub fn new() -> Self {
        DownloadState {
            file: None,
            progress: 0,
            downloading: false,
            size: None,
            error: None,
            success: false,
        }
    }

    /// Mark a transfer as started.
    ///
    /// Progress is deliberately not reset: it keeps showing the previous
    /// value until the new transfer's first callback lands.
    pub fn begin(&mut self) {
        self.downloading = true;
    }

    /// Mark the in-flight transfer as settled.
    pub fn finish(&mut self) {
        self.downloading = false;
    }

    /// Fold a raw progress event into the percentage.
    ///
    /// Events with an unknown total (0) are skipped; the previous value
    /// stays in place.
    pub fn record_progress(&mut self, bytes_written: u64, bytes_expected: u64) {
        if let Some(pct) = progress::percent(bytes_written, bytes_expected) {
            self.progress = pct;
        }
    }

    /// Record a successful download.
    ///
    /// Clears the error, latches `success`, and remembers the file URI.
    /// `size` is updated only when the transfer reported a content length;
    /// otherwise the previous value stays.
    pub fn record_success(&mut self, uri: String, content_length: Option<u64>) {
        if let Some(len) = content_length {
            self.size = Some(len);
        }
        self.success = true;
        self.error = None;
        self.file = Some(uri);
    }

    /// Record a failed download.
    ///
    /// Only the error message changes; `success`, `file`, and `size` keep
    /// describing the last success.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

impl Default for DownloadState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = DownloadState::new();
        assert_eq!(state.file, None);
        assert_eq!(state.progress, 0);
        assert!(!state.downloading);
        assert_eq!(state.size, None);
        assert_eq!(state.error, None);
        assert!(!state.success);
    }

    #[test]
    fn test_begin_and_finish_toggle_downloading() {
        let mut state = DownloadState::new();
        state.begin();
        assert!(state.downloading);
        state.finish();
        assert!(!state.downloading);
    }

    #[test]
    fn test_begin_keeps_previous_progress() {
        let mut state = DownloadState::new();
        state.record_progress(200, 200);
        state.begin();
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_record_progress_sequence() {
        let mut state = DownloadState::new();
        state.record_progress(50, 200);
        assert_eq!(state.progress, 25);
        state.record_progress(200, 200);
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_record_progress_skips_unknown_total() {
        let mut state = DownloadState::new();
        state.record_progress(50, 200);
        state.record_progress(1024, 0);
        assert_eq!(state.progress, 25, "unknown total must not disturb progress");
    }

    #[test]
    fn test_record_success_sets_outcome_fields() {
        let mut state = DownloadState::new();
        state.record_failure("previous failure");

        state.record_success("file:///docs/report.pdf".to_string(), Some(2048));
        assert!(state.success);
        assert_eq!(state.error, None);
        assert_eq!(state.file.as_deref(), Some("file:///docs/report.pdf"));
        assert_eq!(state.size, Some(2048));
    }

    #[test]
    fn test_record_success_without_length_keeps_size() {
        let mut state = DownloadState::new();
        state.record_success("file:///a".to_string(), Some(512));
        state.record_success("file:///b".to_string(), None);

        assert_eq!(state.size, Some(512));
        assert_eq!(state.file.as_deref(), Some("file:///b"));
    }

    #[test]
    fn test_record_failure_preserves_last_success() {
        let mut state = DownloadState::new();
        state.record_success("file:///a".to_string(), Some(512));

        state.record_failure("network lost");
        assert_eq!(state.error.as_deref(), Some("network lost"));
        assert!(state.success, "failure must not un-latch success");
        assert_eq!(state.file.as_deref(), Some("file:///a"));
        assert_eq!(state.size, Some(512));
    }

    #[test]
    fn test_serializes_with_stable_field_names() {
        let state = DownloadState::new();
        let json = serde_json::to_value(&state).unwrap();

        for key in ["file", "progress", "downloading", "size", "error", "success"] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
    }
}
