//! Runs one page at a time and waits for it to report

use perfref_common::{ExecutionOutcome, PageFailure};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::error::HarnessResult;
use crate::host::{Navigation, PageHost};
use crate::hub::ReportHub;

/// Anything that can turn a page path into an outcome
#[async_trait::async_trait]
pub trait Execute: Send {
    async fn execute(&mut self, page_path: &str) -> ExecutionOutcome;
}

/// Resolves manifest page paths to URLs carrying the report token
#[derive(Debug, Clone)]
pub struct PageLocator {
    page_base: Url,
    callback_base: Url,
}

impl PageLocator {
    /// `page_base` is what manifest paths are relative to; `callback_base`
    /// is the root of the callback server.
    pub fn new(page_base: Url, callback_base: Url) -> Self {
        Self {
            page_base,
            callback_base,
        }
    }

    pub fn report_url(&self, token: Uuid) -> HarnessResult<Url> {
        Ok(self.callback_base.join(&format!("report/{}", token))?)
    }

    pub fn page_url(&self, page_path: &str, token: Uuid) -> HarnessResult<Url> {
        let report = self.report_url(token)?;
        let mut url = self.page_base.join(page_path)?;
        url.query_pairs_mut()
            .append_pair("perfref_token", &token.to_string())
            .append_pair("perfref_report", report.as_str());
        Ok(url)
    }
}

/// Drives the page slot and races each page's report against the timeout
pub struct PageRunner<H> {
    host: H,
    hub: ReportHub,
    locator: PageLocator,
    timeout: Duration,
}

impl<H: PageHost> PageRunner<H> {
    pub fn new(host: H, hub: ReportHub, locator: PageLocator, timeout: Duration) -> Self {
        Self {
            host,
            hub,
            locator,
            timeout,
        }
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Load `page_path` and wait for its report or the timeout
    pub async fn run(&mut self, page_path: &str) -> ExecutionOutcome {
        // Arming before navigating means the page cannot report into a
        // slot that still belongs to its predecessor.
        let mut pending = self.hub.arm(page_path);
        let token = pending.token();
        let deadline = Instant::now() + self.timeout;

        let url = match self.locator.page_url(page_path, token) {
            Ok(url) => url,
            Err(e) => return ExecutionOutcome::Error(PageFailure::navigation(e.to_string())),
        };
        let navigation = Navigation {
            page_path: page_path.to_string(),
            url,
            token,
        };

        debug!(page = %page_path, token = %token, "Navigating");
        let waited = tokio::time::timeout_at(deadline, async {
            self.host.navigate(&navigation).await?;
            HarnessResult::Ok(pending.wait().await)
        })
        .await;

        match waited {
            Ok(Ok(Some(outcome))) => outcome,
            Ok(Ok(None)) => ExecutionOutcome::Error(PageFailure::navigation("page slot was reassigned")),
            Ok(Err(e)) => {
                warn!(page = %page_path, "Navigation failed: {}", e);
                ExecutionOutcome::Error(PageFailure::navigation(e.to_string()))
            }
            Err(_) => {
                warn!(page = %page_path, "Timed out after {} ms", self.timeout.as_millis());
                ExecutionOutcome::Timeout
            }
        }
        // `pending` drops here, so a late report from this page is stale.
    }
}

#[async_trait::async_trait]
impl<H: PageHost> Execute for PageRunner<H> {
    async fn execute(&mut self, page_path: &str) -> ExecutionOutcome {
        self.run(page_path).await
    }
}
