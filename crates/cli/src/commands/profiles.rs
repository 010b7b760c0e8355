//! List the comparison presets

use perfref_common::{HarnessConfig, ProfileName};
use serde::Serialize;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Debug, Serialize)]
pub struct ProfileDisplay {
    pub name: ProfileName,
    #[serde(flatten)]
    pub config: HarnessConfig,
    pub default: bool,
}

impl From<ProfileName> for ProfileDisplay {
    fn from(name: ProfileName) -> Self {
        Self {
            name,
            config: HarnessConfig::preset(name),
            default: name == ProfileName::default(),
        }
    }
}

impl TableDisplay for ProfileDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Profile", "Timeout", "== tolerance", "== floor", "< tolerance", "Cache"]
    }

    fn row(&self) -> Vec<String> {
        let c = &self.config.comparison;
        let name = if self.default {
            format!("{} (default)", self.name)
        } else {
            self.name.to_string()
        };
        vec![
            name,
            format!("{} ms", self.config.timeout_ms),
            format!("{}%", c.equals_tolerance * 100.0),
            c.equals_min_ms.map(|ms| format!("{} ms", ms)).unwrap_or_else(|| "-".to_string()),
            format!("{}%", c.less_than_tolerance * 100.0),
            self.config.cache.to_string(),
        ]
    }
}

pub fn execute(format: OutputFormat) -> anyhow::Result<bool> {
    let profiles: Vec<ProfileDisplay> = ProfileName::ALL.into_iter().map(ProfileDisplay::from).collect();
    print_list(&profiles, format);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_row() {
        let row = ProfileDisplay::from(ProfileName::Standard).row();
        assert_eq!(row, vec!["standard (default)", "10000 ms", "20%", "50 ms", "50%", "memoize"]);
    }

    #[test]
    fn test_strict_row() {
        let row = ProfileDisplay::from(ProfileName::Strict).row();
        assert_eq!(row, vec!["strict", "5000 ms", "10%", "-", "50%", "rerun"]);
    }
}
