//! Progress reporting for transfers.
//!
//! Transports report raw byte counts; the tracker folds them into a rounded
//! percentage. The division is guarded: an expected total of 0 means the
//! server did not say how much is coming, and no percentage can be computed.

/// Callback invoked by a transport as bytes arrive.
///
/// Arguments are `(bytes_written, bytes_expected_total)`. An expected total
/// of 0 means the total is unknown.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Rounded completion percentage for a transfer.
///
/// Returns `None` when the expected total is 0 (unknown), so callers can
/// skip the update rather than divide by zero. Values are clamped to 100
/// in case a server under-reports the total.
pub fn percent(bytes_written: u64, bytes_expected: u64) -> Option<u8> {
    if bytes_expected == 0 {
        return None;
    }
    let ratio = bytes_written as f64 / bytes_expected as f64;
    Some((ratio * 100.0).round().min(100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_basic_values() {
        assert_eq!(percent(50, 200), Some(25));
        assert_eq!(percent(200, 200), Some(100));
        assert_eq!(percent(0, 200), Some(0));
    }

    #[test]
    fn test_percent_rounds_to_nearest() {
        assert_eq!(percent(1, 3), Some(33));
        assert_eq!(percent(2, 3), Some(67));
        assert_eq!(percent(1, 200), Some(1));
        assert_eq!(percent(1, 201), Some(0));
    }

    #[test]
    fn test_percent_unknown_total() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(4096, 0), None);
    }

    #[test]
    fn test_percent_clamps_over_reported_bytes() {
        // Servers occasionally under-report Content-Length.
        assert_eq!(percent(300, 200), Some(100));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_percent_bounded(written in 0u64..=1_000_000, expected in 1u64..=1_000_000) {
                let p = percent(written, expected).unwrap();
                prop_assert!(p <= 100, "percent {} out of range for {}/{}", p, written, expected);
            }

            #[test]
            fn test_percent_matches_rounded_ratio(written in 0u64..=1_000_000, expected in 1u64..=1_000_000) {
                prop_assume!(written <= expected);
                let p = percent(written, expected).unwrap();
                let exact = (written as f64 / expected as f64 * 100.0).round() as u8;
                prop_assert_eq!(p, exact);
            }

            #[test]
            fn test_percent_zero_total_never_computes(written in 0u64..=1_000_000) {
                prop_assert_eq!(percent(written, 0), None);
            }
        }
    }
}
