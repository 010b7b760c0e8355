//! Run a manifest

use anyhow::{Context, Result};
use clap::Args;
use perfref_common::ConfigFile;
use perfref_harness::{Harness, HostConfig, ManifestSource, RunnerConfig, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CacheArg, ProfileArg};
use crate::output::{print_report, print_success, OutputFormat};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Manifest file or http(s) URL
    pub manifest: String,

    /// Only run the entry whose test page is this path
    #[arg(long)]
    pub test: Option<String>,

    /// Comparison profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// TOML configuration file
    #[arg(long, env = "PERFREF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-page timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Whether pages shared between entries are re-run
    #[arg(long, value_enum)]
    pub cache: Option<CacheArg>,

    /// Callback server address
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Write an HTML results page
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Write the report as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Browser command, `{url}` is replaced with the page URL (must come last)
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    pub browser: Vec<String>,
}

impl RunArgs {
    /// Layer command line flags over the configuration file
    pub fn runner_config(&self) -> Result<RunnerConfig> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::load(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => ConfigFile::default(),
        };

        if let Some(profile) = self.profile {
            file.profile = Some(profile.into());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            file.timeout_ms = Some(timeout_ms);
        }
        if let Some(cache) = self.cache {
            file.cache = Some(cache.into());
        }
        if !self.browser.is_empty() {
            file.browser.command = self.browser.clone();
        }
        if let Some(listen) = self.listen {
            file.server.listen = Some(listen);
        }

        let harness = file.harness_config()?;

        let mut host = HostConfig::default();
        if !file.browser.command.is_empty() {
            host.command = file.browser.command;
        }

        let mut server = ServerConfig::default();
        if let Some(listen) = file.server.listen {
            server.listen = listen;
        }
        server.page_root = file.server.page_root;

        Ok(RunnerConfig { harness, host, server })
    }
}

/// Returns whether every entry passed
pub async fn execute(args: RunArgs, format: OutputFormat) -> Result<bool> {
    let config = args.runner_config()?;
    debug!(?config, "Resolved configuration");

    let source = ManifestSource::parse(&args.manifest)?;
    let report = Harness::new(config).run(&source, args.test.as_deref()).await?;

    print_report(&report, format);

    if let Some(path) = &args.html {
        write_file(path, &report.render_html())?;
        print_success(&format!("Wrote {}", path.display()));
    }
    if let Some(path) = &args.json {
        write_file(path, &report.to_json()?)?;
        print_success(&format!("Wrote {}", path.display()));
    }

    Ok(report.all_passed())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
