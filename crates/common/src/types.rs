//! Core types for perfref

use serde::{Deserialize, Serialize};

/// Comparison policy applied to a test page and its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Test and reference should take roughly the same time
    #[serde(rename = "==")]
    Equals,
    /// Test should take well under the reference time
    #[serde(rename = "<")]
    LessThan,
}

impl Comparator {
    /// The manifest token for this comparator
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equals => "==",
            Comparator::LessThan => "<",
        }
    }

    pub fn from_symbol(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Comparator::Equals),
            "<" => Some(Comparator::LessThan),
            _ => None,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One manifest line: a test page, its reference page and the comparator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub test_path: String,
    pub ref_path: String,
    pub comparator: Comparator,
}

impl ManifestEntry {
    pub fn new(comparator: Comparator, test_path: impl Into<String>, ref_path: impl Into<String>) -> Self {
        Self {
            test_path: test_path.into(),
            ref_path: ref_path.into(),
            comparator,
        }
    }
}

/// Payload a page posts back to the harness once it has finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PageReport {
    Time(f64),
    Error(String),
}

/// Why a page produced no timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The page threw and reported the exception itself
    PageException,
    /// The host could not point the page slot at the page
    NavigationFailed,
    /// The page reported something the harness could not interpret
    MalformedReport,
}

/// Structured failure payload carried by [`ExecutionOutcome::Error`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFailure {
    pub reason: FailureReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PageFailure {
    pub fn exception(detail: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::PageException,
            detail: Some(detail.into()),
        }
    }

    pub fn navigation(detail: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::NavigationFailed,
            detail: Some(detail.into()),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::MalformedReport,
            detail: Some(detail.into()),
        }
    }
}

impl std::fmt::Display for PageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.reason {
            FailureReason::PageException => "Exception",
            FailureReason::NavigationFailed => "Navigation failed",
            FailureReason::MalformedReport => "Malformed report",
        };
        write!(f, "{}: {}", prefix, self.detail.as_deref().unwrap_or(""))
    }
}

/// Result of executing one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Time { value_ms: f64 },
    Error(PageFailure),
    Timeout,
}

impl ExecutionOutcome {
    pub fn time(value_ms: f64) -> Self {
        ExecutionOutcome::Time { value_ms }
    }

    pub fn time_ms(&self) -> Option<f64> {
        match self {
            ExecutionOutcome::Time { value_ms } => Some(*value_ms),
            _ => None,
        }
    }
}

impl From<PageReport> for ExecutionOutcome {
    fn from(report: PageReport) -> Self {
        match report {
            PageReport::Time(value_ms) => ExecutionOutcome::Time { value_ms },
            PageReport::Error(message) => ExecutionOutcome::Error(PageFailure::exception(message)),
        }
    }
}

/// Final classification of a manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    Error,
    Timeout,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "pass"),
            Status::Fail => write!(f, "fail"),
            Status::Error => write!(f, "error"),
            Status::Timeout => write!(f, "timeout"),
        }
    }
}

/// Both outcomes of a manifest entry, before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedOutcome {
    pub entry: ManifestEntry,
    pub test_outcome: ExecutionOutcome,
    pub ref_outcome: ExecutionOutcome,
}

/// A classified manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub test_path: String,
    pub ref_path: String,
    pub comparator: Comparator,
    pub test_outcome: ExecutionOutcome,
    pub ref_outcome: ExecutionOutcome,
    pub status: Status,
    #[serde(default)]
    pub message: String,
}

impl ResultRecord {
    pub fn new(paired: PairedOutcome, status: Status, message: String) -> Self {
        let PairedOutcome {
            entry,
            test_outcome,
            ref_outcome,
        } = paired;
        Self {
            test_path: entry.test_path,
            ref_path: entry.ref_path,
            comparator: entry.comparator,
            test_outcome,
            ref_outcome,
            status,
            message,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_report_wire_format() {
        let time: PageReport = serde_json::from_str(r#"{"type":"time","value":12.5}"#).unwrap();
        assert_eq!(time, PageReport::Time(12.5));

        let error: PageReport = serde_json::from_str(r#"{"type":"error","value":"boom"}"#).unwrap();
        assert_eq!(error, PageReport::Error("boom".to_string()));

        assert!(serde_json::from_str::<PageReport>(r#"{"type":"timeout"}"#).is_err());
    }

    #[test]
    fn test_exception_display() {
        let failure = PageFailure::exception("ReferenceError: x is not defined");
        assert_eq!(failure.to_string(), "Exception: ReferenceError: x is not defined");
    }

    #[test]
    fn test_comparator_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Comparator::LessThan).unwrap(), r#""<""#);
        assert_eq!(Comparator::from_symbol("=="), Some(Comparator::Equals));
        assert_eq!(Comparator::from_symbol("<="), None);
    }
}
