use semver::Version;
use crate::action::Action;
use crate::backend::{installed_version, Backend, InstalledPackage, SearchHit};
use crate::error::{FudgeError, Result};
use crate::execute::InvocationContext;
use crate::fudgefile::{base_dir, Fudgefile, PackageSpec};
use crate::precondition;
use crate::request::InvocationRequest;

/// How a run ended, short of a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    /// Nothing was done, and that is fine.
    Notice(String),
    /// The invocation itself was unusable.
    Failure(String),
}

/// Where a manifest entry stands on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    NotInstalled,
    Installed { version: String, matches: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub wanted: String,
    pub status: ListStatus,
}

/// Runs the handler for the request's action.
pub fn dispatch(
    ctx: &InvocationContext,
    fudgefile: Option<&Fudgefile>,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    let request = &ctx.request;
    match request.action {
        Action::Install | Action::Upgrade | Action::Uninstall => {
            execute_apply(ctx, request.action, required(ctx, fudgefile)?, backend)
        }
        Action::Reinstall => execute_reinstall(ctx, required(ctx, fudgefile)?, backend),
        Action::Pack => execute_pack(ctx, required(ctx, fudgefile)?, backend),
        Action::List => execute_list(ctx, required(ctx, fudgefile)?, backend),
        Action::Search => execute_search(ctx, backend),
        Action::New => execute_new(ctx, backend),
        Action::Delete => execute_delete(ctx, required(ctx, fudgefile)?, backend),
    }
}

fn required<'a>(ctx: &InvocationContext, fudgefile: Option<&'a Fudgefile>) -> Result<&'a Fudgefile> {
    fudgefile.ok_or_else(|| FudgeError::NotFound(ctx.request.fudgefile_path.clone()))
}

/// Runs `action` for each package in turn and fails afterwards if any of them failed.
fn apply_packages(
    ctx: &InvocationContext,
    action: Action,
    packages: &[(&str, &PackageSpec)],
    backend: &mut dyn Backend,
) -> Result<()> {
    let mut failed = Vec::new();
    for (name, spec) in packages {
        match action {
            Action::Uninstall => ctx.reporter.detail(&format!("Running {action} for {name}")),
            _ => ctx
                .reporter
                .detail(&format!("Running {action} for {name} ({})", spec.display_version())),
        }
        if !backend.apply(action, name, spec)? {
            ctx.reporter.failure(&format!("Failed to {action} {name}"));
            failed.push(name.to_string());
        }
    }
    if !failed.is_empty() {
        return Err(FudgeError::Backend {
            action: action.to_string(),
            failed,
        });
    }
    Ok(())
}

fn scoped<'a>(request: &InvocationRequest, fudgefile: &'a Fudgefile) -> Vec<(&'a str, &'a PackageSpec)> {
    fudgefile.scoped_packages(request.key(), request.dev, request.dev_only)
}

pub fn execute_apply(
    ctx: &InvocationContext,
    action: Action,
    fudgefile: &Fudgefile,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    let packages = scoped(&ctx.request, fudgefile);
    apply_packages(ctx, action, &packages, backend)?;
    Ok(Outcome::Success(format!("Package {action} complete")))
}

/// Uninstalls then installs the same scope. A failed uninstall does not stop the install.
pub fn execute_reinstall(
    ctx: &InvocationContext,
    fudgefile: &Fudgefile,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    let packages = scoped(&ctx.request, fudgefile);
    match apply_packages(ctx, Action::Uninstall, &packages, backend) {
        Ok(()) => {}
        Err(e @ FudgeError::Backend { .. }) => {
            tracing::info!("continuing reinstall after failed uninstall: {e}");
            ctx.reporter.failure(&format!("{e}, continuing with install"));
        }
        Err(e) => return Err(e),
    }
    apply_packages(ctx, Action::Install, &packages, backend)?;
    Ok(Outcome::Success(String::from("Package reinstall complete")))
}

pub fn execute_pack(
    ctx: &InvocationContext,
    fudgefile: &Fudgefile,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    let base = base_dir(&ctx.request.fudgefile_path);
    let mut failed = Vec::new();
    for (name, path) in fudgefile.pack_specs(ctx.request.key(), &base) {
        ctx.reporter.detail(&format!("Packing {name} ({})", path.display()));
        if !path.exists() {
            ctx.reporter.failure(&format!("Nuspec for {name} not found: {}", path.display()));
        }
        if !backend.pack(&path)? {
            ctx.reporter.failure(&format!("Failed to pack {name}"));
            failed.push(name.to_string());
        }
    }
    if !failed.is_empty() {
        return Err(FudgeError::Backend {
            action: Action::Pack.to_string(),
            failed,
        });
    }
    Ok(Outcome::Success(String::from("Packing complete")))
}

/// Compares a wanted version with an installed one. `None` wants any version.
pub fn version_matches(wanted: Option<&str>, installed: &str) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    match (Version::parse(wanted), Version::parse(installed)) {
        (Ok(wanted), Ok(installed)) => wanted == installed,
        _ => wanted.eq_ignore_ascii_case(installed),
    }
}

pub fn list_entries(packages: &[(&str, &PackageSpec)], installed: &[InstalledPackage]) -> Vec<ListEntry> {
    packages
        .iter()
        .map(|(name, spec)| {
            let status = match installed_version(installed, name) {
                Some(version) => ListStatus::Installed {
                    version: version.to_string(),
                    matches: version_matches(spec.version(), version),
                },
                None => ListStatus::NotInstalled,
            };
            ListEntry {
                name: name.to_string(),
                wanted: spec.display_version().to_string(),
                status,
            }
        })
        .collect()
}

pub fn execute_list(
    ctx: &InvocationContext,
    fudgefile: &Fudgefile,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    let installed = backend.installed()?;
    let entries = list_entries(&scoped(&ctx.request, fudgefile), &installed);
    for entry in &entries {
        match &entry.status {
            ListStatus::Installed { version, matches: true } => ctx
                .reporter
                .success(&format!("{}: {} (installed: {})", entry.name, entry.wanted, version)),
            ListStatus::Installed { version, matches: false } => ctx
                .reporter
                .notice(&format!("{}: {} (installed: {})", entry.name, entry.wanted, version)),
            ListStatus::NotInstalled => ctx
                .reporter
                .failure(&format!("{}: {} (not installed)", entry.name, entry.wanted)),
        }
    }
    Ok(Outcome::Success(format!("Listed {} package(s)", entries.len())))
}

pub fn annotate(hits: Vec<SearchHit>, installed: &[InstalledPackage]) -> Vec<SearchHit> {
    hits.into_iter()
        .map(|hit| SearchHit {
            installed: installed_version(installed, &hit.name).map(String::from),
            ..hit
        })
        .collect()
}

pub fn execute_search(ctx: &InvocationContext, backend: &mut dyn Backend) -> Result<Outcome> {
    let installed = backend.installed()?;
    let term = ctx.request.key().unwrap_or_default();
    let hits = annotate(backend.search(term, ctx.request.limit)?, &installed);
    for hit in &hits {
        match &hit.installed {
            Some(version) => ctx
                .reporter
                .success(&format!("{}@{} (installed: {})", hit.name, hit.version, version)),
            None => ctx.reporter.detail(&format!("{}@{}", hit.name, hit.version)),
        }
    }
    Ok(Outcome::Success(format!("Found {} package(s)", hits.len())))
}

/// Writes a fresh Fudgefile and, with `--install`, installs what it lists.
pub fn execute_new(ctx: &InvocationContext, backend: &mut dyn Backend) -> Result<Outcome> {
    let path = &ctx.request.fudgefile_path;
    let fudgefile = Fudgefile::skeleton(ctx.request.key());
    fudgefile.save(path)?;
    ctx.reporter.detail(&format!("Created Fudgefile at {}", path.display()));
    if !ctx.request.install {
        return Ok(Outcome::Success(String::from("Fudgefile created")));
    }
    let install = InvocationRequest {
        action: Action::Install,
        ..ctx.request.clone()
    };
    if let Some(notice) = precondition::check(&install, &fudgefile) {
        return Ok(Outcome::Notice(notice));
    }
    let packages = scoped(&install, &fudgefile);
    apply_packages(ctx, Action::Install, &packages, backend)?;
    Ok(Outcome::Success(String::from("Fudgefile created and packages installed")))
}

/// Removes the Fudgefile, uninstalling its packages first with `--uninstall`.
pub fn execute_delete(
    ctx: &InvocationContext,
    fudgefile: &Fudgefile,
    backend: &mut dyn Backend,
) -> Result<Outcome> {
    if ctx.request.uninstall {
        let packages = scoped(&ctx.request, fudgefile);
        if packages.is_empty() {
            ctx.reporter.detail("No packages to uninstall");
        } else {
            apply_packages(ctx, Action::Uninstall, &packages, backend)?;
        }
    }
    let path = &ctx.request.fudgefile_path;
    std::fs::remove_file(path)?;
    ctx.reporter.detail(&format!("Deleted {}", path.display()));
    Ok(Outcome::Success(String::from("Fudgefile deleted")))
}
