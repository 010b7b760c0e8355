//! Parse a manifest without running it

use anyhow::Result;
use clap::Args;
use perfref_common::{Manifest, ManifestEntry};
use perfref_harness::ManifestSource;

use crate::output::{print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest file or http(s) URL
    pub manifest: String,

    /// Only list the entry whose test page is this path
    #[arg(long)]
    pub test: Option<String>,
}

impl TableDisplay for ManifestEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Comparator", "Test", "Reference"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.comparator.to_string(),
            self.test_path.clone(),
            self.ref_path.clone(),
        ]
    }
}

pub async fn execute(args: CheckArgs, format: OutputFormat) -> Result<bool> {
    let source = ManifestSource::parse(&args.manifest)?;
    let text = source.load().await?;
    let manifest = Manifest::parse(&text, args.test.as_deref())?;

    let entries: Vec<ManifestEntry> = manifest.into_iter().collect();
    print_list(&entries, format);
    if format == OutputFormat::Table {
        print_success(&format!("{}: {} entries", source, entries.len()));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perf-reftest.list");
        std::fs::write(&path, "# perf\n== a.html b.html\n< c.html d.html\n").unwrap();

        let args = CheckArgs {
            manifest: path.to_string_lossy().into_owned(),
            test: None,
        };
        assert!(execute(args, OutputFormat::Plain).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_reports_syntax_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perf-reftest.list");
        std::fs::write(&path, "== a.html b.html\n== c.html\n").unwrap();

        let args = CheckArgs {
            manifest: path.to_string_lossy().into_owned(),
            test: None,
        };
        let err = execute(args, OutputFormat::Plain).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load manifest: syntax error on line 2");
    }
}
