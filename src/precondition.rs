use crate::action::Action;
use crate::fudgefile::Fudgefile;
use crate::request::InvocationRequest;

/// Checks whether there is anything to do before touching the system.
///
/// Returns a notice when the run should stop quietly, `None` to carry on.
pub fn check(request: &InvocationRequest, fudgefile: &Fudgefile) -> Option<String> {
    if request.action.is_package_action() {
        return check_packages(request, fudgefile);
    }
    if request.action == Action::Pack {
        return check_pack(request, fudgefile);
    }
    None
}

fn check_packages(request: &InvocationRequest, fudgefile: &Fudgefile) -> Option<String> {
    if request.dev_only && !fudgefile.has_dev_packages() {
        return Some(String::from("There are no devPackages to process in the Fudgefile"));
    }
    if !fudgefile.has_packages() && (!request.dev || !fudgefile.has_dev_packages()) {
        return Some(String::from("There are no packages to process in the Fudgefile"));
    }
    if let Some(key) = request.key() {
        if fudgefile
            .scoped_packages(Some(key), request.dev, request.dev_only)
            .is_empty()
        {
            return Some(format!("Package '{key}' is not in the Fudgefile"));
        }
    }
    None
}

fn check_pack(request: &InvocationRequest, fudgefile: &Fudgefile) -> Option<String> {
    if fudgefile.pack.is_empty() {
        return Some(String::from("There are no nuspecs to pack in the Fudgefile"));
    }
    if let Some(key) = request.key() {
        if !fudgefile.pack.keys().any(|name| name.eq_ignore_ascii_case(key)) {
            return Some(format!("Fudgefile does not contain a nuspec for '{key}'"));
        }
    }
    None
}
