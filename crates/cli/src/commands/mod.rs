//! CLI Commands

pub mod check;
pub mod profiles;
pub mod run;

use clap::ValueEnum;
use perfref_common::{CachePolicy, ProfileName};

/// `--profile` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Standard,
    Strict,
}

impl From<ProfileArg> for ProfileName {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Standard => ProfileName::Standard,
            ProfileArg::Strict => ProfileName::Strict,
        }
    }
}

/// `--cache` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    /// Run each distinct page once and share its result
    Memoize,
    /// Run a page every time an entry names it
    Rerun,
}

impl From<CacheArg> for CachePolicy {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::Memoize => CachePolicy::Memoize,
            CacheArg::Rerun => CachePolicy::Rerun,
        }
    }
}
