//! Report aggregation and rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::types::{ExecutionOutcome, ResultRecord};

/// One rendered row of the results table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub record: ResultRecord,

    /// Comparator and both page paths, followed by the failure message
    pub description: String,

    /// "X.XX ms" when the test page produced a timing
    pub test_time: String,

    /// "X.XX ms" when the reference page produced a timing
    pub ref_time: String,
}

impl ReportRow {
    fn new(record: ResultRecord) -> Self {
        let mut description = format!("{} {} {}", record.comparator, record.test_path, record.ref_path);
        if !record.message.is_empty() {
            description.push('\n');
            description.push_str(&record.message);
        }
        Self {
            description,
            test_time: format_time(&record.test_outcome),
            ref_time: format_time(&record.ref_outcome),
            record,
        }
    }
}

/// Completed run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub passed: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Accumulates classified records in manifest order
#[derive(Debug)]
pub struct ReportBuilder {
    rows: Vec<ReportRow>,
    passed: usize,
    started_at: DateTime<Utc>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            rows: Vec::new(),
            passed: 0,
            started_at,
        }
    }

    pub fn push(&mut self, record: ResultRecord) {
        if record.passed() {
            self.passed += 1;
        }
        self.rows.push(ReportRow::new(record));
    }

    pub fn finish(self) -> Report {
        Report {
            total: self.rows.len(),
            passed: self.passed,
            rows: self.rows,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ResultRecord> for Report {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        let mut builder = ReportBuilder::new();
        for record in iter {
            builder.push(record);
        }
        builder.finish()
    }
}

impl Report {
    /// "Finished: P/N tests passed"
    pub fn summary(&self) -> String {
        format!("Finished: {}/{} tests passed", self.passed, self.total)
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standalone HTML page with the results table
    pub fn render_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>perf-reftest results</title>\n\
             <style>\n\
             table { border-collapse: collapse; }\n\
             td, th { border: 1px solid #ccc; padding: 2px 6px; white-space: pre-wrap; }\n\
             tr.pass td:first-child { background: #cfc; }\n\
             tr.fail td:first-child { background: #fcc; }\n\
             </style>\n</head>\n<body>\n",
        );
        let _ = writeln!(html, "<p id=\"status\">{}</p>", escape_html(&self.summary()));
        html.push_str("<table id=\"results\">\n");
        html.push_str("<tr><th>Status</th><th>Test</th><th>Time (test)</th><th>Time (ref)</th></tr>\n");

        for row in &self.rows {
            let record = &row.record;
            let class = if record.passed() { "pass" } else { "fail" };
            let _ = writeln!(
                html,
                "<tr class=\"{class}\"><td>{status}</td><td>{cmp} <a href=\"{test}\">{test}</a> <a href=\"{reference}\">{reference}</a>\n{message}</td><td>{test_time}</td><td>{ref_time}</td></tr>",
                status = record.status,
                cmp = escape_html(record.comparator.symbol()),
                test = escape_html(&record.test_path),
                reference = escape_html(&record.ref_path),
                message = escape_html(&record.message),
                test_time = row.test_time,
                ref_time = row.ref_time,
            );
        }

        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

/// Render a timing cell
pub fn format_time(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Time { value_ms } => format!("{:.2} ms", value_ms),
        _ => String::new(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
