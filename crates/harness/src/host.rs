//! The page slot: whatever actually loads and runs a page

use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{HarnessError, HarnessResult};

/// Placeholder replaced with the page URL in browser command arguments
pub const URL_PLACEHOLDER: &str = "{url}";

/// One request to load a page into the slot
#[derive(Debug, Clone)]
pub struct Navigation {
    pub page_path: String,
    pub url: Url,
    pub token: Uuid,
}

/// A single reusable slot pages are loaded into. Navigating replaces
/// whatever page was loaded before.
#[async_trait::async_trait]
pub trait PageHost: Send {
    async fn navigate(&mut self, navigation: &Navigation) -> HarnessResult<()>;

    /// Empty the slot once the run is over
    async fn clear(&mut self) -> HarnessResult<()> {
        Ok(())
    }
}

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Program and arguments. The page URL replaces `{url}`, or is
    /// appended when no argument mentions it.
    pub command: Vec<String>,

    /// How long a replaced browser gets to exit after SIGTERM
    pub shutdown_grace: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "chromium".to_string(),
                "--headless=new".to_string(),
                URL_PLACEHOLDER.to_string(),
            ],
            shutdown_grace: Duration::from_millis(500),
        }
    }
}

/// Runs one browser process per navigation
pub struct CommandHost {
    config: HostConfig,
    current: Option<Child>,
}

impl CommandHost {
    pub fn new(config: HostConfig) -> HarnessResult<Self> {
        if config.command.is_empty() {
            return Err(HarnessError::Host("browser command is empty".to_string()));
        }
        Ok(Self { config, current: None })
    }

    /// Expand the command template for `url`
    pub fn command_line(&self, url: &Url) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .config
            .command
            .iter()
            .map(|arg| {
                if arg.contains(URL_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(URL_PLACEHOLDER, url.as_str())
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(url.to_string());
        }
        args
    }

    async fn stop_current(&mut self) {
        let Some(mut child) = self.current.take() else {
            return;
        };

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                    && tokio::time::timeout(self.config.shutdown_grace, child.wait()).await.is_ok()
                {
                    return;
                }
            }
        }

        if let Err(e) = child.kill().await {
            warn!("Failed to kill browser process: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl PageHost for CommandHost {
    async fn navigate(&mut self, navigation: &Navigation) -> HarnessResult<()> {
        self.stop_current().await;

        let args = self.command_line(&navigation.url);
        debug!(page = %navigation.page_path, "Launching {}", args.join(" "));

        let child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HarnessError::Host(format!("failed to spawn {}: {}", args[0], e)))?;

        self.current = Some(child);
        Ok(())
    }

    async fn clear(&mut self) -> HarnessResult<()> {
        if self.current.is_some() {
            info!("Closing browser");
        }
        self.stop_current().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(command: &[&str]) -> CommandHost {
        CommandHost::new(HostConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_placeholder_substitution() {
        let url = Url::parse("http://127.0.0.1:4000/pages/a.html?perfref_token=x").unwrap();
        let host = host(&["firefox", "--headless", "--url={url}"]);
        assert_eq!(
            host.command_line(&url),
            vec!["firefox", "--headless", "--url=http://127.0.0.1:4000/pages/a.html?perfref_token=x"]
        );
    }

    #[test]
    fn test_url_appended_without_placeholder() {
        let url = Url::parse("http://127.0.0.1:4000/pages/a.html").unwrap();
        let host = host(&["open-page"]);
        assert_eq!(host.command_line(&url), vec!["open-page", "http://127.0.0.1:4000/pages/a.html"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(
            CommandHost::new(HostConfig {
                command: vec![],
                ..Default::default()
            }),
            Err(HarnessError::Host(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_navigation_replaces_running_process() {
        let mut host = host(&["sh", "-c", "sleep 30", "perfref", "{url}"]);
        let navigation = Navigation {
            page_path: "a.html".to_string(),
            url: Url::parse("http://127.0.0.1/a.html").unwrap(),
            token: Uuid::new_v4(),
        };

        host.navigate(&navigation).await.unwrap();
        assert!(host.current.is_some());
        host.navigate(&navigation).await.unwrap();
        assert!(host.current.is_some());
        host.clear().await.unwrap();
        assert!(host.current.is_none());
    }

    #[tokio::test]
    async fn test_missing_program_fails_navigation() {
        let mut host = host(&["perfref-definitely-not-a-browser"]);
        let navigation = Navigation {
            page_path: "a.html".to_string(),
            url: Url::parse("http://127.0.0.1/a.html").unwrap(),
            token: Uuid::new_v4(),
        };
        assert!(matches!(host.navigate(&navigation).await, Err(HarnessError::Host(_))));
    }
}
