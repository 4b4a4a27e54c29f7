use std::path::{Path, PathBuf};
use std::cell::Cell;
use tempfile::TempDir;
use fudge::*;

/// Records every backend call instead of running a package manager.
#[derive(Default)]
struct RecordingBackend {
    calls: Vec<String>,
    missing: bool,
    fail_uninstall: bool,
    fail_pack: Option<String>,
    installed: Vec<InstalledPackage>,
    hits: Vec<SearchHit>,
}

impl Backend for RecordingBackend {
    fn is_available(&self) -> bool {
        !self.missing
    }

    fn install_self(&mut self) -> Result<(), FudgeError> {
        self.calls.push("install-backend".to_string());
        self.missing = false;
        Ok(())
    }

    fn apply(&mut self, action: Action, name: &str, spec: &PackageSpec) -> Result<bool, FudgeError> {
        self.calls.push(format!("{action} {name} {}", spec.display_version()));
        Ok(!(action == Action::Uninstall && self.fail_uninstall))
    }

    fn installed(&mut self) -> Result<Vec<InstalledPackage>, FudgeError> {
        self.calls.push("installed".to_string());
        Ok(self.installed.clone())
    }

    fn search(&mut self, term: &str, limit: usize) -> Result<Vec<SearchHit>, FudgeError> {
        self.calls.push(format!("search {term} {limit}"));
        Ok(self.hits.clone())
    }

    fn pack(&mut self, spec_path: &Path) -> Result<bool, FudgeError> {
        let file_name = spec_path.file_name().unwrap().to_string_lossy().to_string();
        self.calls.push(format!("pack {file_name}"));
        Ok(self.fail_pack.as_deref() != Some(file_name.as_str()))
    }
}

fn setup_tests(json: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Fudgefile");
    std::fs::write(&path, json).unwrap();
    (temp_dir, path)
}

fn args(action: &str, path: &Path) -> RawArgs {
    RawArgs {
        action: Some(action.to_string()),
        fudgefile_path: Some(path.to_path_buf()),
        ..RawArgs::default()
    }
}

const SAMPLE: &str = r#"{ "packages": { "git": "1.0" }, "devPackages": { "fiddler": "2.0" } }"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: RawArgs, backend: &mut RecordingBackend) -> Result<Outcome, FudgeError> {
        execute(args, backend, || true, Reporter)
    }

    #[test]
    fn test_install_without_dev_only_touches_packages() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let outcome = run(args("install", &path), &mut backend).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
        assert_eq!(backend.calls, vec!["install git 1.0"]);
    }

    #[test]
    fn test_install_with_dev_includes_dev_packages() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let mut raw = args("install", &path);
        raw.dev = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["install git 1.0", "install fiddler 2.0"]);
    }

    #[test]
    fn test_dev_only_scopes_to_dev_packages() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let mut raw = args("upgrade", &path);
        raw.dev_only = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["upgrade fiddler 2.0"]);
    }

    #[test]
    fn test_invalid_action_does_nothing() {
        let mut backend = RecordingBackend::default();
        let checked = Cell::new(false);
        let raw = RawArgs {
            action: Some("explode".to_string()),
            fudgefile_path: Some(PathBuf::from("/does/not/exist/Fudgefile")),
            ..RawArgs::default()
        };
        let outcome = execute(raw, &mut backend, || { checked.set(true); true }, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Failure(_)));
        assert!(backend.calls.is_empty());
        assert!(!checked.get());
    }

    #[test]
    fn test_missing_action_is_a_failure() {
        let mut backend = RecordingBackend::default();
        let outcome = run(RawArgs::default(), &mut backend).unwrap();
        assert_eq!(outcome, Outcome::Failure("No action supplied".to_string()));
    }

    #[test]
    fn test_empty_packages_is_a_notice_without_calls() {
        let (_dir, path) = setup_tests(r#"{ "devPackages": { "fiddler": "2.0" } }"#);
        let mut backend = RecordingBackend::default();
        let outcome = run(args("install", &path), &mut backend).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_missing_fudgefile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut backend = RecordingBackend::default();
        let err = run(args("install", &dir.path().join("Fudgefile")), &mut backend).unwrap_err();
        assert!(matches!(err, FudgeError::NotFound(_)));
    }

    #[test]
    fn test_not_elevated_is_a_notice() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let outcome = execute(args("install", &path), &mut backend, || false, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_list_does_not_need_elevation() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let outcome = execute(args("list", &path), &mut backend, || false, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
        assert_eq!(backend.calls, vec!["installed"]);
    }

    #[test]
    fn test_missing_backend_is_installed_when_elevated() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend { missing: true, ..RecordingBackend::default() };
        run(args("install", &path), &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["install-backend", "install git 1.0"]);
    }

    #[test]
    fn test_missing_backend_without_elevation_is_a_notice() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend { missing: true, ..RecordingBackend::default() };
        let outcome = execute(args("list", &path), &mut backend, || false, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_reinstall_uninstalls_before_installing() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let mut raw = args("reinstall", &path);
        raw.key = Some("git".to_string());
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["uninstall git 1.0", "install git 1.0"]);
    }

    #[test]
    fn test_reinstall_continues_after_failed_uninstall() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend { fail_uninstall: true, ..RecordingBackend::default() };
        let outcome = run(args("reinstall", &path), &mut backend).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
        assert_eq!(backend.calls, vec!["uninstall git 1.0", "install git 1.0"]);
    }

    #[test]
    fn test_failed_uninstall_is_an_error() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend { fail_uninstall: true, ..RecordingBackend::default() };
        let err = run(args("uninstall", &path), &mut backend).unwrap_err();
        match err {
            FudgeError::Backend { action, failed } => {
                assert_eq!(action, "uninstall");
                assert_eq!(failed, vec!["git"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pack_all_and_by_key() {
        let (dir, path) = setup_tests(r#"{ "pack": { "api": "api.nuspec", "site": "web/site.nuspec" } }"#);
        let mut backend = RecordingBackend::default();
        run(args("pack", &path), &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["pack api.nuspec", "pack site.nuspec"]);

        let mut backend = RecordingBackend::default();
        let mut raw = args("pack", &path);
        raw.key = Some("site".to_string());
        raw.dev_only = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["pack site.nuspec"]);
        drop(dir);
    }

    #[test]
    fn test_pack_unknown_key_is_a_notice() {
        let (_dir, path) = setup_tests(r#"{ "pack": { "api": "api.nuspec" } }"#);
        let mut backend = RecordingBackend::default();
        let mut raw = args("pack", &path);
        raw.key = Some("site".to_string());
        let outcome = run(raw, &mut backend).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_search_unlimited_and_annotated() {
        let mut backend = RecordingBackend {
            installed: vec![InstalledPackage { name: "checksum".into(), version: "0.2.0".into() }],
            hits: vec![SearchHit { name: "checksum".into(), version: "0.2.0".into(), installed: None }],
            ..RecordingBackend::default()
        };
        let raw = RawArgs {
            action: Some("search".to_string()),
            key: Some("checksum".to_string()),
            limit: Some(0),
            fudgefile_path: Some(PathBuf::from("/does/not/exist/Fudgefile")),
            ..RawArgs::default()
        };
        let outcome = execute(raw, &mut backend, || false, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
        assert_eq!(backend.calls, vec!["installed", "search checksum 0"]);
    }

    #[test]
    fn test_new_creates_without_installing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Fudgefile");
        let mut backend = RecordingBackend::default();
        let mut raw = args("new", &path);
        raw.key = Some("git".to_string());
        run(raw, &mut backend).unwrap();
        assert!(path.exists());
        assert!(backend.calls.is_empty());
        let created = Fudgefile::load(&path).unwrap();
        assert!(created.packages.contains_key("git"));
    }

    #[test]
    fn test_new_with_install_installs_seeded_package() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Fudgefile");
        let mut backend = RecordingBackend::default();
        let mut raw = args("new", &path);
        raw.key = Some("git".to_string());
        raw.install = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["install git latest"]);
    }

    #[test]
    fn test_new_fails_when_fudgefile_exists() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let err = run(args("new", &path), &mut backend).unwrap_err();
        assert!(matches!(err, FudgeError::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_delete_uninstalls_then_removes() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let mut raw = args("delete", &path);
        raw.uninstall = true;
        raw.dev = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["uninstall git 1.0", "uninstall fiddler 2.0"]);
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_empty_fudgefile() {
        let (_dir, path) = setup_tests("{}");
        let mut backend = RecordingBackend::default();
        let mut raw = args("delete", &path);
        raw.uninstall = true;
        run(raw, &mut backend).unwrap();
        assert!(backend.calls.is_empty());
        assert!(!path.exists());
    }
    #[test]
    fn test_failed_uninstall_keeps_fudgefile_on_delete() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend { fail_uninstall: true, ..RecordingBackend::default() };
        let mut raw = args("delete", &path);
        raw.uninstall = true;
        let err = run(raw, &mut backend).unwrap_err();
        assert!(matches!(err, FudgeError::Backend { .. }));
        assert_eq!(backend.calls, vec!["uninstall git 1.0"]);
        assert!(path.exists());
    }

    #[test]
    fn test_new_with_install_without_elevation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Fudgefile");
        let mut backend = RecordingBackend::default();
        let mut raw = args("new", &path);
        raw.key = Some("git".to_string());
        raw.install = true;
        let outcome = execute(raw, &mut backend, || false, Reporter).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_dev_package_key_without_dev_is_a_notice() {
        let (_dir, path) = setup_tests(SAMPLE);
        let mut backend = RecordingBackend::default();
        let mut raw = args("install", &path);
        raw.key = Some("fiddler".to_string());
        let outcome = run(raw, &mut backend).unwrap();
        assert!(matches!(outcome, Outcome::Notice(_)));
        assert!(backend.calls.is_empty());

        let mut raw = args("install", &path);
        raw.key = Some("fiddler".to_string());
        raw.dev = true;
        run(raw, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["install fiddler 2.0"]);
    }

    #[test]
    fn test_failed_pack_entry_still_packs_the_rest() {
        let (_dir, path) = setup_tests(r#"{ "pack": { "api": "api.nuspec", "site": "web/site.nuspec" } }"#);
        let mut backend = RecordingBackend {
            fail_pack: Some("api.nuspec".to_string()),
            ..RecordingBackend::default()
        };
        let err = run(args("pack", &path), &mut backend).unwrap_err();
        assert_eq!(backend.calls, vec!["pack api.nuspec", "pack site.nuspec"]);
        match err {
            FudgeError::Backend { action, failed } => {
                assert_eq!(action, "pack");
                assert_eq!(failed, vec!["api"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
