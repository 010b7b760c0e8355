//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use perfref_common::{Report, ReportRow, Status};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for ReportRow {
    fn headers() -> Vec<&'static str> {
        vec!["Status", "Test", "Time (test)", "Time (ref)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            status_label(self.record.status),
            self.description.clone(),
            self.test_time.clone(),
            self.ref_time.clone(),
        ]
    }
}

fn status_label(status: Status) -> String {
    let label = status.to_string().to_uppercase();
    match status {
        Status::Pass => label.green().to_string(),
        Status::Fail => label.red().to_string(),
        Status::Error | Status::Timeout => label.yellow().to_string(),
    }
}

/// Render a list of items in the requested format
pub fn render_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }

            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(items).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(items).unwrap_or_default(),
        OutputFormat::Plain => {
            let mut out = Vec::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push("---".to_string());
                }
                for (header, value) in T::headers().iter().zip(item.row()) {
                    out.push(format!("{}: {}", header, value));
                }
            }
            out.join("\n")
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && format != OutputFormat::Json {
        println!("No items found.");
        return;
    }
    println!("{}", render_list(items, format));
}

/// Print a finished run: rows, then the summary line
pub fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", report.to_json().unwrap_or_default()),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(report).unwrap_or_default()),
        OutputFormat::Table | OutputFormat::Plain => {
            if !report.rows.is_empty() {
                println!("{}", render_list(&report.rows, format));
            }
            println!("{}", report.summary());
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfref_common::{
        Comparator, ExecutionOutcome, ManifestEntry, PairedOutcome, ReportBuilder, ResultRecord,
    };

    fn report() -> Report {
        let paired = PairedOutcome {
            entry: ManifestEntry::new(Comparator::LessThan, "a.html", "a-ref.html"),
            test_outcome: ExecutionOutcome::time(40.0),
            ref_outcome: ExecutionOutcome::time(100.0),
        };
        let mut builder = ReportBuilder::new();
        builder.push(ResultRecord::new(paired, Status::Pass, String::new()));
        builder.finish()
    }

    #[test]
    fn test_plain_rows() {
        colored::control::set_override(false);
        let report = report();
        let text = render_list(&report.rows, OutputFormat::Plain);
        assert_eq!(
            text,
            "Status: PASS\nTest: < a.html a-ref.html\nTime (test): 40.00 ms\nTime (ref): 100.00 ms"
        );
    }

    #[test]
    fn test_yaml_is_real_yaml() {
        let report = report();
        let yaml = render_list(&report.rows, OutputFormat::Yaml);
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed[0]["test_path"].as_str(), Some("a.html"));
        assert_eq!(parsed[0]["status"].as_str(), Some("pass"));
    }

    #[test]
    fn test_table_has_headers() {
        let report = report();
        let table = render_list(&report.rows, OutputFormat::Table);
        assert!(table.contains("Time (test)"));
        assert!(table.contains("a.html"));
    }
}
