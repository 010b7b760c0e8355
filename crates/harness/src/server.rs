//! Callback server - serves pages and the in-page helper, and receives reports

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use perfref_common::{ExecutionOutcome, PageFailure, PageReport};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{HarnessError, HarnessResult};
use crate::hub::{Delivery, ReportHub};

/// Helper script pages include to time themselves and report back
pub const HELPER_SCRIPT: &str = include_str!("perf-reftest.js");

/// Configuration for the callback server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (port 0 = pick a free port)
    pub listen: SocketAddr,

    /// Directory served under `/pages/`, if any
    pub page_root: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            page_root: None,
        }
    }
}

/// Handle to the running callback server
pub struct CallbackServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Bind and start serving in the background
    pub async fn start(config: ServerConfig, hub: ReportHub) -> HarnessResult<Self> {
        let listener = tokio::net::TcpListener::bind(config.listen)
            .await
            .map_err(|e| HarnessError::ServerStartup(format!("failed to bind {}: {}", config.listen, e)))?;
        let addr = listener.local_addr()?;

        let app = router(hub, config.page_root.as_ref());
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warn!("Callback server stopped: {}", e);
            }
        });

        info!("Callback server listening on http://{}", addr);
        Ok(Self {
            addr,
            shutdown: Some(shutdown),
            task,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Root URL of the server, with a trailing slash
    pub fn base_url(&self) -> HarnessResult<Url> {
        Ok(Url::parse(&format!("http://{}/", self.addr))?)
    }

    /// Where locally served pages live
    pub fn pages_url(&self) -> HarnessResult<Url> {
        Ok(self.base_url()?.join("pages/")?)
    }

    /// Stop accepting connections and wait for the server task
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("Callback server task failed: {}", e);
        }
        debug!("Callback server stopped");
    }
}

/// Build the server routes
pub fn router(hub: ReportHub, page_root: Option<&PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/report/:token", post(report_handler))
        .route("/perf-reftest.js", get(helper_handler))
        .with_state(hub);

    if let Some(root) = page_root {
        app = app.nest_service("/pages", ServeDir::new(root));
    }

    app.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}

async fn report_handler(
    State(hub): State<ReportHub>,
    Path(token): Path<Uuid>,
    body: String,
) -> StatusCode {
    let outcome = match serde_json::from_str::<PageReport>(&body) {
        Ok(report) => ExecutionOutcome::from(report),
        Err(e) => {
            warn!(token = %token, "Malformed page report: {}", e);
            ExecutionOutcome::Error(PageFailure::malformed(e.to_string()))
        }
    };

    match hub.deliver(token, outcome) {
        Delivery::Accepted => StatusCode::NO_CONTENT,
        Delivery::Stale => StatusCode::GONE,
    }
}

async fn helper_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        HELPER_SCRIPT,
    )
}
