use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{FudgeError, Result};

/// Represents the contents of a `Fudgefile`.
///
/// Every section is optional on disk and loads as an empty map when absent.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Fudgefile {
    /// Packages the project needs, keyed by package name.
    #[serde(default)]
    pub packages: BTreeMap<String, PackageSpec>,
    /// Packages only needed while developing the project.
    #[serde(default, rename = "devPackages")]
    pub dev_packages: BTreeMap<String, PackageSpec>,
    /// Logical names mapped to `.nuspec` files, relative to the Fudgefile.
    #[serde(default)]
    pub pack: BTreeMap<String, PathBuf>,
}

/// The value of a package entry: either a bare version or an options object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PackageSpec {
    Version(String),
    Detailed(PackageOptions),
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct PackageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Alternate feed to install from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Extra raw arguments, passed through to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

impl PackageSpec {
    pub fn latest() -> PackageSpec {
        PackageSpec::Version(String::from("latest"))
    }

    /// The pinned version, or `None` when the newest release is wanted.
    pub fn version(&self) -> Option<&str> {
        let version = match self {
            PackageSpec::Version(version) => Some(version.as_str()),
            PackageSpec::Detailed(options) => options.version.as_deref(),
        };
        version
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("latest"))
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            PackageSpec::Version(_) => None,
            PackageSpec::Detailed(options) => options.source.as_deref(),
        }
    }

    pub fn extra_args(&self) -> Vec<String> {
        match self {
            PackageSpec::Version(_) => Vec::new(),
            PackageSpec::Detailed(options) => options
                .args
                .as_deref()
                .unwrap_or_default()
                .split_whitespace()
                .map(String::from)
                .collect(),
        }
    }

    /// What to show the user for this entry.
    pub fn display_version(&self) -> &str {
        self.version().unwrap_or("latest")
    }
}

impl Fudgefile {
    /// Creates an empty Fudgefile. A non-empty `key` is seeded as a package at `latest`.
    pub fn skeleton(key: Option<&str>) -> Fudgefile {
        let mut fudgefile = Fudgefile::default();
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            fudgefile.packages.insert(key.to_string(), PackageSpec::latest());
        }
        fudgefile
    }

    /// Loads a Fudgefile from a file path.
    ///
    /// # Errors
    /// [`FudgeError::NotFound`] if the file is missing, [`FudgeError::Parse`] if it is not a
    /// valid Fudgefile.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Fudgefile> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FudgeError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| FudgeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the Fudgefile to the given path as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn has_packages(&self) -> bool {
        !self.packages.is_empty()
    }

    pub fn has_dev_packages(&self) -> bool {
        !self.dev_packages.is_empty()
    }

    /// The packages an action works on, in name order.
    ///
    /// `dev_only` picks `devPackages` alone; otherwise `packages` is used, plus
    /// `devPackages` when `dev` is set. A `key` narrows the result to that entry.
    pub fn scoped_packages(
        &self,
        key: Option<&str>,
        dev: bool,
        dev_only: bool,
    ) -> Vec<(&str, &PackageSpec)> {
        let mut selected: Vec<(&str, &PackageSpec)> = Vec::new();
        if !dev_only {
            selected.extend(self.packages.iter().map(|(n, s)| (n.as_str(), s)));
        }
        if dev || dev_only {
            for (name, spec) in &self.dev_packages {
                if !selected.iter().any(|(n, _)| *n == name.as_str()) {
                    selected.push((name.as_str(), spec));
                }
            }
        }
        if let Some(key) = key {
            selected.retain(|(name, _)| name.eq_ignore_ascii_case(key));
        }
        selected
    }

    /// The `pack` entries to process, with paths resolved against `base_dir`.
    pub fn pack_specs(&self, key: Option<&str>, base_dir: &Path) -> Vec<(&str, PathBuf)> {
        self.pack
            .iter()
            .filter(|(name, _)| key.is_none_or(|key| name.eq_ignore_ascii_case(key)))
            .map(|(name, path)| (name.as_str(), base_dir.join(path)))
            .collect()
    }
}

/// Fails if something already sits at `path`. Guards the `new` flow.
pub fn ensure_absent<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Err(FudgeError::AlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

/// Directory the Fudgefile's relative paths are resolved against.
pub fn base_dir(fudgefile_path: &Path) -> PathBuf {
    match fudgefile_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
