//! Per-run memo of page outcomes

use perfref_common::{CachePolicy, ExecutionOutcome};
use std::collections::HashMap;
use tracing::debug;

use crate::runner::Execute;

/// Remembers each page's outcome for the rest of the run so a reference
/// shared by several entries is only loaded once. With
/// [`CachePolicy::Rerun`] every lookup executes the page again.
#[derive(Debug)]
pub struct ResultCache {
    policy: CachePolicy,
    outcomes: HashMap<String, ExecutionOutcome>,
    executions: usize,
    hits: usize,
}

impl ResultCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            outcomes: HashMap::new(),
            executions: 0,
            hits: 0,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Pages actually executed so far
    pub fn executions(&self) -> usize {
        self.executions
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn get(&self, page_path: &str) -> Option<&ExecutionOutcome> {
        self.outcomes.get(page_path)
    }

    pub async fn get_or_run<E>(&mut self, page_path: &str, executor: &mut E) -> ExecutionOutcome
    where
        E: Execute + ?Sized,
    {
        if self.policy == CachePolicy::Memoize {
            if let Some(outcome) = self.outcomes.get(page_path) {
                debug!(page = %page_path, "Using cached outcome");
                self.hits += 1;
                return outcome.clone();
            }
        }

        let outcome = executor.execute(page_path).await;
        self.executions += 1;

        if self.policy == CachePolicy::Memoize {
            self.outcomes.insert(page_path.to_string(), outcome.clone());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        calls: Vec<String>,
    }

    #[async_trait::async_trait]
    impl Execute for Counter {
        async fn execute(&mut self, page_path: &str) -> ExecutionOutcome {
            self.calls.push(page_path.to_string());
            ExecutionOutcome::time(self.calls.len() as f64)
        }
    }

    #[tokio::test]
    async fn test_memoize_runs_each_page_once() {
        let mut cache = ResultCache::new(CachePolicy::Memoize);
        let mut counter = Counter::default();

        let first = cache.get_or_run("ref.html", &mut counter).await;
        let second = cache.get_or_run("ref.html", &mut counter).await;
        let other = cache.get_or_run("other.html", &mut counter).await;

        assert_eq!(first, ExecutionOutcome::time(1.0));
        assert_eq!(second, first);
        assert_eq!(other, ExecutionOutcome::time(2.0));
        assert_eq!(counter.calls, vec!["ref.html", "other.html"]);
        assert_eq!(cache.executions(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.get("ref.html"), Some(&ExecutionOutcome::time(1.0)));
    }

    #[tokio::test]
    async fn test_memoize_keeps_failures() {
        struct AlwaysTimeout;

        #[async_trait::async_trait]
        impl Execute for AlwaysTimeout {
            async fn execute(&mut self, _page_path: &str) -> ExecutionOutcome {
                ExecutionOutcome::Timeout
            }
        }

        let mut cache = ResultCache::new(CachePolicy::Memoize);
        cache.get_or_run("slow.html", &mut AlwaysTimeout).await;
        assert_eq!(cache.get_or_run("slow.html", &mut AlwaysTimeout).await, ExecutionOutcome::Timeout);
        assert_eq!(cache.executions(), 1);
    }

    #[tokio::test]
    async fn test_rerun_executes_every_occurrence() {
        let mut cache = ResultCache::new(CachePolicy::Rerun);
        let mut counter = Counter::default();

        cache.get_or_run("ref.html", &mut counter).await;
        let again = cache.get_or_run("ref.html", &mut counter).await;

        assert_eq!(again, ExecutionOutcome::time(2.0));
        assert_eq!(counter.calls.len(), 2);
        assert_eq!(cache.hits(), 0);
        assert!(cache.get("ref.html").is_none());
    }
}
