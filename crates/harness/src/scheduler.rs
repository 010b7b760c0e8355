//! Sequential test scheduling
//!
//! Entries run strictly one after another: the test page, then the
//! reference page, then the next entry. Page timings are only comparable
//! when nothing else is loading at the same time.

use perfref_common::{Manifest, PairedOutcome};
use tracing::info;

use crate::cache::ResultCache;
use crate::runner::Execute;

pub struct TestScheduler<E> {
    executor: E,
    cache: ResultCache,
}

impl<E: Execute> TestScheduler<E> {
    pub fn new(executor: E, cache: ResultCache) -> Self {
        Self { executor, cache }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Run every entry in manifest order, one outcome pair per entry
    pub async fn run(&mut self, manifest: &Manifest) -> Vec<PairedOutcome> {
        let total = manifest.len();
        let mut paired = Vec::with_capacity(total);

        for (i, entry) in manifest.iter().enumerate() {
            info!("Running test {}/{} (test: {})", i + 1, total, entry.test_path);
            let test_outcome = self.cache.get_or_run(&entry.test_path, &mut self.executor).await;

            info!("Running test {}/{} (ref: {})", i + 1, total, entry.ref_path);
            let ref_outcome = self.cache.get_or_run(&entry.ref_path, &mut self.executor).await;

            paired.push(PairedOutcome {
                entry: entry.clone(),
                test_outcome,
                ref_outcome,
            });
        }

        info!(
            "Executed {} page(s), {} cache hit(s)",
            self.cache.executions(),
            self.cache.hits()
        );
        paired
    }
}
