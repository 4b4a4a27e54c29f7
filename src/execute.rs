use crate::action::Action;
use crate::backend::Backend;
use crate::dispatch::{dispatch, Outcome};
use crate::error::{FudgeError, Result};
use crate::fudgefile::{ensure_absent, Fudgefile};
use crate::precondition;
use crate::report::Reporter;
use crate::request::{InvocationRequest, RawArgs};

/// Everything a handler needs to know about the current run.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request: InvocationRequest,
    pub reporter: Reporter,
    pub elevated: bool,
}

/// Runs one invocation end to end and reports how it went.
///
/// Callers wrap the whole run, configuration loading included, in a
/// [`RunTimer`](crate::report::RunTimer) so the elapsed time is printed however it
/// ends. `is_elevated` is only consulted when the action needs it.
pub fn execute(
    args: RawArgs,
    backend: &mut dyn Backend,
    is_elevated: impl Fn() -> bool,
    reporter: Reporter,
) -> Result<Outcome> {
    let outcome = run(args, backend, is_elevated, reporter)?;
    match &outcome {
        Outcome::Success(msg) => reporter.success(msg),
        Outcome::Notice(msg) => reporter.notice(msg),
        Outcome::Failure(msg) => reporter.failure(msg),
    }
    Ok(outcome)
}

fn run(
    args: RawArgs,
    backend: &mut dyn Backend,
    is_elevated: impl Fn() -> bool,
    reporter: Reporter,
) -> Result<Outcome> {
    let request = match InvocationRequest::from_args(args) {
        Ok(request) => request,
        Err(FudgeError::InvalidAction(action)) if action.trim().is_empty() => {
            return Ok(Outcome::Failure(String::from("No action supplied")));
        }
        Err(e @ FudgeError::InvalidAction(_)) => return Ok(Outcome::Failure(e.to_string())),
        Err(e) => return Err(e),
    };
    tracing::debug!(?request, "validated invocation");

    let path = &request.fudgefile_path;
    let fudgefile = match request.action {
        Action::New => {
            ensure_absent(path)?;
            None
        }
        Action::Search => None,
        _ => Some(Fudgefile::load(path)?),
    };

    if let Some(fudgefile) = &fudgefile {
        if let Some(notice) = precondition::check(&request, fudgefile) {
            return Ok(Outcome::Notice(notice));
        }
    }

    let elevated = (request.requires_elevation() || request.requires_backend()) && is_elevated();
    if request.requires_elevation() && !elevated {
        return Ok(Outcome::Notice(format!(
            "'{}' must be run from an elevated (administrator) prompt",
            request.action
        )));
    }

    if request.requires_backend() && !backend.is_available() {
        if !elevated {
            return Ok(Outcome::Notice(String::from(
                "The package manager is not installed, run fudge elevated to install it",
            )));
        }
        reporter.detail("Installing the package manager");
        backend.install_self()?;
    }

    let ctx = InvocationContext {
        request,
        reporter,
        elevated,
    };
    dispatch(&ctx, fudgefile.as_ref(), backend)
}
