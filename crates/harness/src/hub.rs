//! Per-navigation report slot
//!
//! Every navigation arms the hub with a fresh token. Only a report carrying
//! the currently armed token is delivered; anything else comes from a page
//! that was already superseded and is dropped.

use parking_lot::Mutex;
use perfref_common::ExecutionOutcome;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

/// What happened to a report handed to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Stale,
}

struct Armed {
    token: Uuid,
    page_path: String,
    sender: oneshot::Sender<ExecutionOutcome>,
}

/// Shared slot the callback server reports into
#[derive(Clone, Default)]
pub struct ReportHub {
    active: Arc<Mutex<Option<Armed>>>,
}

impl ReportHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot for a new navigation, superseding any previous one
    pub fn arm(&self, page_path: &str) -> PendingReport {
        let token = Uuid::new_v4();
        let (sender, receiver) = oneshot::channel();

        let previous = self.active.lock().replace(Armed {
            token,
            page_path: page_path.to_string(),
            sender,
        });
        if let Some(previous) = previous {
            debug!(token = %previous.token, page = %previous.page_path, "Superseding pending report");
        }

        PendingReport {
            token,
            receiver,
            hub: self.clone(),
        }
    }

    /// Hand a page's result to whoever is waiting on `token`
    pub fn deliver(&self, token: Uuid, outcome: ExecutionOutcome) -> Delivery {
        let armed = {
            let mut active = self.active.lock();
            match active.as_ref() {
                Some(armed) if armed.token == token => active.take(),
                _ => None,
            }
        };

        match armed {
            Some(armed) => {
                debug!(token = %token, page = %armed.page_path, "Report received");
                if armed.sender.send(outcome).is_err() {
                    // The waiter gave up between the lock and the send.
                    return Delivery::Stale;
                }
                Delivery::Accepted
            }
            None => {
                warn!(token = %token, "Discarding report from a superseded page");
                Delivery::Stale
            }
        }
    }

    pub fn active_token(&self) -> Option<Uuid> {
        self.active.lock().as_ref().map(|armed| armed.token)
    }

    fn disarm(&self, token: Uuid) {
        let mut active = self.active.lock();
        if active.as_ref().map_or(false, |armed| armed.token == token) {
            *active = None;
        }
    }
}

/// Waiter side of one armed navigation. Dropping it disarms the slot so a
/// late report is treated as stale.
pub struct PendingReport {
    token: Uuid,
    receiver: oneshot::Receiver<ExecutionOutcome>,
    hub: ReportHub,
}

impl PendingReport {
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// Wait for the report. `None` if the slot was re-armed first.
    pub async fn wait(&mut self) -> Option<ExecutionOutcome> {
        (&mut self.receiver).await.ok()
    }
}

impl Drop for PendingReport {
    fn drop(&mut self) {
        self.hub.disarm(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_to_active_token() {
        let hub = ReportHub::new();
        let mut pending = hub.arm("a.html");
        assert_eq!(hub.active_token(), Some(pending.token()));

        assert_eq!(hub.deliver(pending.token(), ExecutionOutcome::time(3.0)), Delivery::Accepted);
        assert_eq!(pending.wait().await, Some(ExecutionOutcome::time(3.0)));
        assert_eq!(hub.active_token(), None);
    }

    #[tokio::test]
    async fn test_second_report_is_stale() {
        let hub = ReportHub::new();
        let pending = hub.arm("a.html");
        let token = pending.token();

        assert_eq!(hub.deliver(token, ExecutionOutcome::time(1.0)), Delivery::Accepted);
        assert_eq!(hub.deliver(token, ExecutionOutcome::time(2.0)), Delivery::Stale);
    }

    #[tokio::test]
    async fn test_rearm_supersedes_previous_navigation() {
        let hub = ReportHub::new();
        let mut first = hub.arm("a.html");
        let mut second = hub.arm("b.html");

        assert_eq!(hub.deliver(first.token(), ExecutionOutcome::time(1.0)), Delivery::Stale);
        assert_eq!(first.wait().await, None);

        assert_eq!(hub.deliver(second.token(), ExecutionOutcome::time(2.0)), Delivery::Accepted);
        assert_eq!(second.wait().await, Some(ExecutionOutcome::time(2.0)));
    }

    #[tokio::test]
    async fn test_drop_disarms_only_own_token() {
        let hub = ReportHub::new();
        let first = hub.arm("a.html");
        let first_token = first.token();
        drop(first);
        assert_eq!(hub.active_token(), None);
        assert_eq!(hub.deliver(first_token, ExecutionOutcome::Timeout), Delivery::Stale);

        let stale = hub.arm("b.html");
        let current = hub.arm("c.html");
        drop(stale);
        assert_eq!(hub.active_token(), Some(current.token()));
    }
}
