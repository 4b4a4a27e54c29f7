use std::fmt;
use std::str::FromStr;
use crate::error::FudgeError;

/// Every action `fudge` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Upgrade,
    Uninstall,
    Reinstall,
    Pack,
    List,
    Search,
    New,
    Delete,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Install,
        Action::Upgrade,
        Action::Uninstall,
        Action::Reinstall,
        Action::Pack,
        Action::List,
        Action::Search,
        Action::New,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Upgrade => "upgrade",
            Action::Uninstall => "uninstall",
            Action::Reinstall => "reinstall",
            Action::Pack => "pack",
            Action::List => "list",
            Action::Search => "search",
            Action::New => "new",
            Action::Delete => "delete",
        }
    }

    /// Actions that operate on the `packages`/`devPackages` sections.
    pub fn is_package_action(&self) -> bool {
        matches!(
            self,
            Action::Install | Action::Upgrade | Action::Uninstall | Action::Reinstall | Action::List
        )
    }

    /// Whether the action reads an existing Fudgefile before doing anything.
    pub fn requires_fudgefile(&self) -> bool {
        !matches!(self, Action::New | Action::Search)
    }

    /// Whether the run must be elevated. `new --install` and
    /// `delete --uninstall` touch the system and lose their exemption.
    pub fn requires_elevation(&self, install: bool, uninstall: bool) -> bool {
        match self {
            Action::List | Action::Search => false,
            Action::New => install,
            Action::Delete => uninstall,
            _ => true,
        }
    }

    /// Whether the backend has to be present for this run.
    pub fn requires_backend(&self, install: bool, uninstall: bool) -> bool {
        match self {
            Action::New => install,
            Action::Delete => uninstall,
            _ => true,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FudgeError::InvalidAction(s.to_string()))
    }
}
