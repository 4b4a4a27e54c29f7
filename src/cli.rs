use std::ffi::OsString;
use std::path::PathBuf;
use clap::Parser;
use fudge::request::RawArgs;

/// Drives the system package manager from a project's Fudgefile.
#[derive(Debug, Parser, Clone)]
#[clap(author, about, long_about = None, disable_version_flag = true)]
pub struct CLI {
    /// install, upgrade, uninstall, reinstall, pack, list, search, new or delete
    #[arg(value_name = "ACTION")]
    pub(crate) action_arg: Option<String>,

    /// Package or nuspec to restrict the action to
    #[arg(value_name = "KEY")]
    pub(crate) key_arg: Option<String>,

    /// The action to run. Takes precedence over the positional ACTION
    #[arg(short, long)]
    pub(crate) action: Option<String>,

    /// Package or nuspec to restrict the action to. Takes precedence over KEY
    #[arg(short, long)]
    pub(crate) key: Option<String>,

    /// Path to the Fudgefile
    #[arg(short = 'f', long = "fudgefilePath", visible_alias = "fp", value_name = "PATH")]
    pub(crate) fudgefile_path: Option<PathBuf>,

    /// Maximum number of search results, 0 for no limit
    #[arg(short, long)]
    pub(crate) limit: Option<usize>,

    /// Include devPackages
    #[arg(short, long)]
    pub(crate) dev: bool,

    /// Only process devPackages (implies --dev)
    #[arg(long = "devOnly", visible_alias = "do")]
    pub(crate) dev_only: bool,

    /// With `new`: install the packages once the Fudgefile is created
    #[arg(short, long)]
    pub(crate) install: bool,

    /// With `delete`: uninstall the packages before removing the Fudgefile
    #[arg(short, long)]
    pub(crate) uninstall: bool,

    /// Print the version and exit
    #[arg(short = 'v', long)]
    pub(crate) version: bool,
}

impl CLI {
    pub fn into_raw_args(self) -> RawArgs {
        RawArgs {
            action: self.action.or(self.action_arg),
            key: self.key.or(self.key_arg),
            fudgefile_path: self.fudgefile_path,
            limit: self.limit,
            dev: self.dev,
            dev_only: self.dev_only,
            install: self.install,
            uninstall: self.uninstall,
        }
    }
}

/// Rewrites the two-letter single-dash flags `-fp` and `-do` to their long
/// aliases, since clap would read them as clusters of one-letter flags.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for short in ["-fp", "-do"] {
                if text == short {
                    return OsString::from(format!("-{short}"));
                }
                if let Some(value) = text.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("-{short}={value}"));
                }
            }
            arg
        })
        .collect()
}
