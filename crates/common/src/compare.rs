//! Comparison policy: turns a pair of outcomes into a pass/fail verdict.
//!
//! This module is I/O-free: it only does arithmetic and classification.

use crate::config::ComparisonProfile;
use crate::types::{Comparator, ExecutionOutcome, PairedOutcome, ResultRecord, Status};

pub const TIMEOUT_MESSAGE: &str = "Test file timed out";

/// Decide whether two timings satisfy `comparator` under `profile`.
///
/// A zero shorter time gives an infinite (or NaN) ratio, which never
/// satisfies the tolerance; only the `==` floor can still pass it.
pub fn timings_pass(comparator: Comparator, test_ms: f64, ref_ms: f64, profile: &ComparisonProfile) -> bool {
    match comparator {
        Comparator::Equals => {
            let (longer, shorter) = if test_ms > ref_ms {
                (test_ms, ref_ms)
            } else {
                (ref_ms, test_ms)
            };
            let within_tolerance = longer / shorter < 1.0 + profile.equals_tolerance;
            let below_floor = profile.equals_min_ms.map_or(false, |min| longer < min);
            within_tolerance || below_floor
        }
        Comparator::LessThan => test_ms < ref_ms * profile.less_than_tolerance,
    }
}

/// Classify one entry. The test page's failure takes precedence over the
/// reference page's.
pub fn classify(paired: PairedOutcome, profile: &ComparisonProfile) -> ResultRecord {
    use ExecutionOutcome::{Error, Time, Timeout};

    let (status, message) = match (&paired.test_outcome, &paired.ref_outcome) {
        (Time { value_ms: test_ms }, Time { value_ms: ref_ms }) => {
            if timings_pass(paired.entry.comparator, *test_ms, *ref_ms, profile) {
                (Status::Pass, String::new())
            } else {
                (Status::Fail, String::new())
            }
        }
        (Timeout, _) | (Time { .. }, Timeout) => (Status::Timeout, TIMEOUT_MESSAGE.to_string()),
        (Error(failure), _) | (Time { .. }, Error(failure)) => (Status::Error, failure.to_string()),
    };

    ResultRecord::new(paired, status, message)
}
