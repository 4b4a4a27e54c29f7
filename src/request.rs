use std::path::PathBuf;
use crate::action::Action;
use crate::error::{FudgeError, Result};

pub const DEFAULT_FUDGEFILE: &str = "Fudgefile";
pub const DEFAULT_LIMIT: usize = 10;

/// Flags exactly as they came off the command line.
#[derive(Debug, Clone, Default)]
pub struct RawArgs {
    pub action: Option<String>,
    pub key: Option<String>,
    pub fudgefile_path: Option<PathBuf>,
    pub limit: Option<usize>,
    pub dev: bool,
    pub dev_only: bool,
    pub install: bool,
    pub uninstall: bool,
}

/// A validated invocation. Built once per run and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub action: Action,
    pub key: Option<String>,
    pub fudgefile_path: PathBuf,
    /// Search result cap, `0` means unlimited.
    pub limit: usize,
    pub dev: bool,
    pub dev_only: bool,
    pub install: bool,
    pub uninstall: bool,
}

impl InvocationRequest {
    /// Validates the action and normalizes the flags.
    ///
    /// # Errors
    /// Returns [`FudgeError::InvalidAction`] if the action is missing, empty or unknown.
    pub fn from_args(args: RawArgs) -> Result<InvocationRequest> {
        let action = match args.action.as_deref() {
            Some(action) if !action.trim().is_empty() => action.parse::<Action>()?,
            _ => return Err(FudgeError::InvalidAction(String::new())),
        };
        let key = args
            .key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Ok(InvocationRequest {
            action,
            key,
            fudgefile_path: args
                .fudgefile_path
                .unwrap_or_else(|| PathBuf::from(".").join(DEFAULT_FUDGEFILE)),
            limit: args.limit.unwrap_or(DEFAULT_LIMIT),
            dev: args.dev || args.dev_only,
            dev_only: args.dev_only,
            install: args.install,
            uninstall: args.uninstall,
        })
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn requires_elevation(&self) -> bool {
        self.action.requires_elevation(self.install, self.uninstall)
    }

    pub fn requires_backend(&self) -> bool {
        self.action.requires_backend(self.install, self.uninstall)
    }
}
