//! One complete harness invocation: load, schedule, compare, report

use perfref_common::{classify, HarnessConfig, Manifest, Report, ReportBuilder};
use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::error::HarnessResult;
use crate::host::{CommandHost, HostConfig, PageHost};
use crate::hub::ReportHub;
use crate::runner::{PageLocator, PageRunner};
use crate::scheduler::TestScheduler;
use crate::server::{CallbackServer, ServerConfig};
use crate::source::ManifestSource;

/// Configuration for a whole run
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub harness: HarnessConfig,
    pub host: HostConfig,
    pub server: ServerConfig,
}

pub struct Harness {
    config: RunnerConfig,
}

impl Harness {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Load the manifest, keeping only `filter` if given. A manifest that
    /// cannot be loaded or parsed aborts before any page runs.
    pub async fn load_manifest(&self, source: &ManifestSource, filter: Option<&str>) -> HarnessResult<Manifest> {
        let text = source.load().await?;
        Ok(Manifest::parse(&text, filter)?)
    }

    /// Run every selected entry with the configured browser
    pub async fn run(&self, source: &ManifestSource, filter: Option<&str>) -> HarnessResult<Report> {
        let manifest = self.load_manifest(source, filter).await?;
        let host = CommandHost::new(self.config.host.clone())?;

        let hub = ReportHub::new();
        let mut server_config = self.config.server.clone();
        if server_config.page_root.is_none() {
            server_config.page_root = source.page_root();
        }
        let server = CallbackServer::start(server_config, hub.clone()).await?;

        let page_base = match source.remote_base() {
            Some(url) => url.clone(),
            None => server.pages_url()?,
        };
        let locator = PageLocator::new(page_base, server.base_url()?);

        let report = run_manifest(&manifest, &self.config.harness, host, hub, locator).await;
        server.shutdown().await;
        Ok(report)
    }
}

/// Schedule `manifest` on `host` and classify the results
pub async fn run_manifest<H: PageHost>(
    manifest: &Manifest,
    config: &HarnessConfig,
    host: H,
    hub: ReportHub,
    locator: PageLocator,
) -> Report {
    let mut builder = ReportBuilder::new();

    let runner = PageRunner::new(host, hub, locator, config.timeout());
    let mut scheduler = TestScheduler::new(runner, ResultCache::new(config.cache));
    let paired = scheduler.run(manifest).await;

    let mut runner = scheduler.into_executor();
    if let Err(e) = runner.host_mut().clear().await {
        warn!("Failed to clear page slot: {}", e);
    }

    for outcome in paired {
        builder.push(classify(outcome, &config.comparison));
    }

    let report = builder.finish();
    info!("{}", report.summary());
    report
}
