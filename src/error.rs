use std::path::PathBuf;
use thiserror::Error;

/// Hard failures of a `fudge` run.
///
/// Usage mistakes and "nothing to do" situations are not errors; they are
/// reported as failures or notices and the run ends cleanly. Everything in
/// here propagates to the binary and makes it exit non-zero.
#[derive(Debug, Error)]
pub enum FudgeError {
    #[error("Invalid action '{0}'. Expected one of: install, upgrade, uninstall, reinstall, pack, list, search, new, delete")]
    InvalidAction(String),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Fudgefile already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Could not parse Fudgefile {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not read config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Backend installation failed: {0}")]
    Install(String),
    #[error("Failed to run '{program}': {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{action} failed for: {}", .failed.join(", "))]
    Backend {
        action: String,
        failed: Vec<String>,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FudgeError>;
