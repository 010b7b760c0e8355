//! Harness configuration and the known comparison profiles

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    /// 10 s timeout, 20% equals slack with a 50 ms floor, shared results
    #[default]
    Standard,
    /// 5 s timeout, 10% equals slack, no floor, every occurrence re-runs
    Strict,
}

impl ProfileName {
    pub const ALL: [ProfileName; 2] = [ProfileName::Standard, ProfileName::Strict];
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileName::Standard => write!(f, "standard"),
            ProfileName::Strict => write!(f, "strict"),
        }
    }
}

/// Whether a page shared between entries runs once or once per occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    Memoize,
    Rerun,
}

impl std::fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CachePolicy::Memoize => write!(f, "memoize"),
            CachePolicy::Rerun => write!(f, "rerun"),
        }
    }
}

/// Tolerances used to classify two timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonProfile {
    /// Fraction the longer run may exceed the shorter one by under `==`
    pub equals_tolerance: f64,

    /// Under `==`, runs whose longer time is below this always pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals_min_ms: Option<f64>,

    /// Under `<`, the test must finish within this fraction of the reference
    pub less_than_tolerance: f64,
}

/// Resolved harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub timeout_ms: u64,
    pub cache: CachePolicy,
    pub comparison: ComparisonProfile,
}

impl HarnessConfig {
    pub fn preset(profile: ProfileName) -> Self {
        match profile {
            ProfileName::Standard => Self {
                timeout_ms: 10_000,
                cache: CachePolicy::Memoize,
                comparison: ComparisonProfile {
                    equals_tolerance: 0.2,
                    equals_min_ms: Some(50.0),
                    less_than_tolerance: 0.5,
                },
            },
            ProfileName::Strict => Self {
                timeout_ms: 5_000,
                cache: CachePolicy::Rerun,
                comparison: ComparisonProfile {
                    equals_tolerance: 0.1,
                    equals_min_ms: None,
                    less_than_tolerance: 0.5,
                },
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject values that would make every comparison meaningless
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeout_ms must be greater than zero".to_string()));
        }
        let c = &self.comparison;
        if !(c.equals_tolerance.is_finite() && c.equals_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "equals_tolerance must be positive, got {}",
                c.equals_tolerance
            )));
        }
        if !(c.less_than_tolerance.is_finite() && c.less_than_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "less_than_tolerance must be positive, got {}",
                c.less_than_tolerance
            )));
        }
        if let Some(min) = c.equals_min_ms {
            if !(min.is_finite() && min >= 0.0) {
                return Err(Error::InvalidConfig(format!("equals_min_ms must be >= 0, got {}", min)));
            }
        }
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::preset(ProfileName::default())
    }
}

/// On-disk configuration. Every field is optional and layered over a preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CachePolicy>,

    pub comparison: ComparisonOverrides,

    pub browser: BrowserSection,

    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals_tolerance: Option<f64>,

    /// `0` effectively disables the floor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals_min_ms: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_than_tolerance: Option<f64>,
}

/// Browser used to load pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserSection {
    /// Program and arguments; `{url}` is replaced with the page URL
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

/// Local callback server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen: Option<SocketAddr>,

    /// Directory pages are served from; defaults to the manifest directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_root: Option<PathBuf>,
}

impl ConfigFile {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply the overrides to the selected preset and validate the result
    pub fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::preset(self.profile.unwrap_or_default());

        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(cache) = self.cache {
            config.cache = cache;
        }
        if let Some(tolerance) = self.comparison.equals_tolerance {
            config.comparison.equals_tolerance = tolerance;
        }
        if let Some(min) = self.comparison.equals_min_ms {
            config.comparison.equals_min_ms = Some(min);
        }
        if let Some(tolerance) = self.comparison.less_than_tolerance {
            config.comparison.less_than_tolerance = tolerance;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let standard = HarnessConfig::preset(ProfileName::Standard);
        assert_eq!(standard.timeout_ms, 10_000);
        assert_eq!(standard.cache, CachePolicy::Memoize);
        assert_eq!(standard.comparison.equals_min_ms, Some(50.0));

        let strict = HarnessConfig::preset(ProfileName::Strict);
        assert_eq!(strict.timeout(), Duration::from_secs(5));
        assert_eq!(strict.cache, CachePolicy::Rerun);
        assert_eq!(strict.comparison.equals_tolerance, 0.1);
        assert_eq!(strict.comparison.equals_min_ms, None);
        assert_eq!(strict.comparison.less_than_tolerance, 0.5);

        assert_eq!(HarnessConfig::default(), standard);
    }

    #[test]
    fn test_overrides_layer_on_profile() {
        let file: ConfigFile = toml::from_str(
            r#"
profile = "strict"
timeout_ms = 8000

[comparison]
equals_min_ms = 20

[browser]
command = ["chromium", "--headless=new", "{url}"]
"#,
        )
        .unwrap();

        let config = file.harness_config().unwrap();
        assert_eq!(config.timeout_ms, 8000);
        assert_eq!(config.cache, CachePolicy::Rerun);
        assert_eq!(config.comparison.equals_tolerance, 0.1);
        assert_eq!(config.comparison.equals_min_ms, Some(20.0));
        assert_eq!(file.browser.command.len(), 3);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<ConfigFile>("timeout = 5").is_err());
    }

    #[test]
    fn test_validation() {
        let file = ConfigFile {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(file.harness_config(), Err(Error::InvalidConfig(_))));

        let file = ConfigFile {
            comparison: ComparisonOverrides {
                less_than_tolerance: Some(-1.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(file.harness_config(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_missing_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("perfref.toml");

        assert_eq!(ConfigFile::load(&path).unwrap(), ConfigFile::default());

        let file = ConfigFile {
            profile: Some(ProfileName::Strict),
            cache: Some(CachePolicy::Memoize),
            ..Default::default()
        };
        file.save(&path).unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), file);
    }
}
