use std::path::Path;
use std::process::{Command, Output, Stdio};
use crate::action::Action;
use crate::backend::{parse_limit_output, Backend, InstalledPackage, SearchHit};
use crate::config::BackendConfig;
use crate::error::{FudgeError, Result};
use crate::fudgefile::PackageSpec;

/// Runs Chocolatey (or anything with the same command line) as the backend.
#[derive(Debug, Clone)]
pub struct Chocolatey {
    config: BackendConfig,
}

impl Chocolatey {
    pub fn new(config: BackendConfig) -> Chocolatey {
        Chocolatey { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    fn command(&self) -> Command {
        Command::new(&self.config.program)
    }

    fn capture(&self, args: &[String]) -> Result<Output> {
        tracing::debug!("running {} {}", self.config.program, args.join(" "));
        self.command()
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| FudgeError::Command {
                program: self.config.program.clone(),
                source,
            })
    }

    fn run(&self, mut command: Command, args: &[String]) -> Result<bool> {
        tracing::debug!("running {} {}", self.config.program, args.join(" "));
        let status = command
            .args(args)
            .status()
            .map_err(|source| FudgeError::Command {
                program: self.config.program.clone(),
                source,
            })?;
        if !status.success() {
            tracing::warn!("{} exited with {}", self.config.program, status);
        }
        Ok(status.success())
    }
}

/// Builds the argument list for an install, upgrade or uninstall of one package.
pub fn apply_args(action: Action, name: &str, spec: &PackageSpec) -> Vec<String> {
    let mut args = vec![action.as_str().to_string(), name.to_string(), String::from("-y")];
    if action != Action::Uninstall {
        if let Some(version) = spec.version() {
            args.push(String::from("--version"));
            args.push(version.to_string());
        }
        if let Some(source) = spec.source() {
            args.push(String::from("--source"));
            args.push(source.to_string());
        }
    }
    args.extend(spec.extra_args());
    args
}

/// Builds the argument list for a search, paging when a limit is set.
pub fn search_args(term: &str, limit: usize) -> Vec<String> {
    let mut args = vec![String::from("search"), term.to_string(), String::from("--limit-output")];
    if limit > 0 {
        args.push(String::from("--page-size"));
        args.push(limit.to_string());
        args.push(String::from("--page"));
        args.push(String::from("0"));
    }
    args
}

impl Backend for Chocolatey {
    fn is_available(&self) -> bool {
        self.command()
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    fn install_self(&mut self) -> Result<()> {
        let script = format!(
            "Set-ExecutionPolicy Bypass -Scope Process -Force; \
             [System.Net.ServicePointManager]::SecurityProtocol = 3072; \
             iex ((New-Object System.Net.WebClient).DownloadString('{}'))",
            self.config.install_script_url
        );
        let status = Command::new("powershell")
            .args(["-NoProfile", "-InputFormat", "None", "-ExecutionPolicy", "Bypass", "-Command"])
            .arg(script)
            .status()
            .map_err(|e| FudgeError::Install(e.to_string()))?;
        if !status.success() {
            return Err(FudgeError::Install(format!("installer exited with {status}")));
        }
        if !self.is_available() {
            return Err(FudgeError::Install(format!(
                "'{}' is still not available after installing",
                self.config.program
            )));
        }
        Ok(())
    }

    #[cfg(not(windows))]
    fn install_self(&mut self) -> Result<()> {
        Err(FudgeError::Install(format!(
            "'{}' cannot be installed automatically on this platform",
            self.config.program
        )))
    }

    fn apply(&mut self, action: Action, name: &str, spec: &PackageSpec) -> Result<bool> {
        self.run(self.command(), &apply_args(action, name, spec))
    }

    fn installed(&mut self) -> Result<Vec<InstalledPackage>> {
        let args = self.config.list_args.clone();
        let output = self.capture(&args)?;
        if !output.status.success() {
            return Err(FudgeError::Backend {
                action: String::from("list"),
                failed: vec![self.config.program.clone()],
            });
        }
        Ok(parse_limit_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn search(&mut self, term: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let output = self.capture(&search_args(term, limit))?;
        if !output.status.success() {
            return Err(FudgeError::Backend {
                action: String::from("search"),
                failed: vec![term.to_string()],
            });
        }
        let mut hits: Vec<SearchHit> = parse_limit_output(&String::from_utf8_lossy(&output.stdout))
            .into_iter()
            .map(|package| SearchHit {
                name: package.name,
                version: package.version,
                installed: None,
            })
            .collect();
        if limit > 0 {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    fn pack(&mut self, spec_path: &Path) -> Result<bool> {
        if !spec_path.exists() {
            tracing::warn!("nuspec not found: {}", spec_path.display());
            return Ok(false);
        }
        let mut command = self.command();
        if let Some(dir) = spec_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        let file_name = spec_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        self.run(command, &[String::from("pack"), file_name])
    }
}
