//! perfref harness runtime
//!
//! Runs a manifest of (test page, reference page, comparator) entries one
//! page at a time and collects each page's self-reported timing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Harness::run(source, filter)                               │
//! │    ├── ManifestSource::load() -> text                       │
//! │    ├── Manifest::parse(text, filter)                        │
//! │    ├── CallbackServer   POST /report/:token -> ReportHub    │
//! │    └── TestScheduler                                        │
//! │          └── ResultCache::get_or_run(page)                  │
//! │                └── PageRunner::run(page)                    │
//! │                      ├── ReportHub::arm() -> token          │
//! │                      ├── PageHost::navigate(url?token)      │
//! │                      └── report | timeout, first one wins   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  classify(pair) -> ResultRecord -> ReportBuilder -> Report  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod harness;
pub mod host;
pub mod hub;
pub mod runner;
pub mod scheduler;
pub mod server;
pub mod source;

pub use cache::ResultCache;
pub use error::{HarnessError, HarnessResult};
pub use harness::{run_manifest, Harness, RunnerConfig};
pub use host::{CommandHost, HostConfig, Navigation, PageHost};
pub use hub::{Delivery, PendingReport, ReportHub};
pub use runner::{Execute, PageLocator, PageRunner};
pub use scheduler::TestScheduler;
pub use server::{CallbackServer, ServerConfig};
pub use source::ManifestSource;
