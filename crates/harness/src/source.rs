//! Where the manifest comes from

use perfref_common::Error;
use reqwest::header::CACHE_CONTROL;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::error::HarnessResult;

/// A manifest on disk or behind an http(s) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    Url(Url),
}

impl ManifestSource {
    /// Treat `http://` and `https://` locations as URLs, anything else as a path
    pub fn parse(location: &str) -> HarnessResult<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(ManifestSource::Url(Url::parse(location)?))
        } else {
            Ok(ManifestSource::File(PathBuf::from(location)))
        }
    }

    /// Directory to serve pages from, for manifests on disk
    pub fn page_root(&self) -> Option<PathBuf> {
        match self {
            ManifestSource::File(path) => Some(
                path.parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            ),
            ManifestSource::Url(_) => None,
        }
    }

    /// Base URL pages resolve against, for remote manifests
    pub fn remote_base(&self) -> Option<&Url> {
        match self {
            ManifestSource::File(_) => None,
            ManifestSource::Url(url) => Some(url),
        }
    }

    /// Fetch the manifest text. Any failure is fatal to the run.
    pub async fn load(&self) -> HarnessResult<String> {
        info!("Loading manifest");
        match self {
            ManifestSource::File(path) => {
                debug!("Reading manifest from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| Error::ManifestLoad(format!("{}: {}", path.display(), e)).into())
            }
            ManifestSource::Url(url) => {
                debug!("Fetching manifest from {}", url);
                let response = reqwest::Client::new()
                    .get(url.clone())
                    .header(CACHE_CONTROL, "no-cache")
                    .send()
                    .await
                    .map_err(|e| Error::ManifestLoad(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let reason = status.canonical_reason().unwrap_or(status.as_str());
                    return Err(Error::ManifestLoad(reason.to_string()).into());
                }

                Ok(response.text().await.map_err(|e| Error::ManifestLoad(e.to_string()))?)
            }
        }
    }
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::Url(url) => write!(f, "{}", url),
        }
    }
}
