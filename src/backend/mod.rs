//! The external package manager `fudge` delegates to.

pub mod choco;

use std::path::Path;
use crate::action::Action;
use crate::error::Result;
use crate::fudgefile::PackageSpec;

pub use choco::Chocolatey;

/// A package reported as installed on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// A package found in the backend's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub version: String,
    /// Locally installed version, if any.
    pub installed: Option<String>,
}

/// Operations `fudge` needs from a package manager.
///
/// `apply` and `pack` return `Ok(false)` when the backend ran but reported
/// failure; `Err` is reserved for not being able to run it at all.
pub trait Backend {
    fn is_available(&self) -> bool;

    fn install_self(&mut self) -> Result<()>;

    /// Runs install, upgrade or uninstall for one package.
    fn apply(&mut self, action: Action, name: &str, spec: &PackageSpec) -> Result<bool>;

    fn installed(&mut self) -> Result<Vec<InstalledPackage>>;

    /// Queries the package index. A `limit` of `0` means unlimited.
    fn search(&mut self, term: &str, limit: usize) -> Result<Vec<SearchHit>>;

    fn pack(&mut self, spec_path: &Path) -> Result<bool>;
}

/// Parses `name|version` lines as printed with `--limit-output`.
pub fn parse_limit_output(output: &str) -> Vec<InstalledPackage> {
    output
        .lines()
        .filter_map(|line| {
            let (name, version) = line.trim().split_once('|')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(InstalledPackage {
                name: name.to_string(),
                version: version.split('|').next().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// Looks up the installed version of `name`, ignoring case.
pub fn installed_version<'a>(installed: &'a [InstalledPackage], name: &str) -> Option<&'a str> {
    installed
        .iter()
        .find(|package| package.name.eq_ignore_ascii_case(name))
        .map(|package| package.version.as_str())
}
