use std::path::Path;
use std::process::{Command, Stdio};

use assert_cmd::cargo::cargo_bin;
use assert_fs::TempDir;
use assert_fs::fixture::{ChildPath, FileWriteStr, PathChild, PathCreateDir};

pub struct TestContext {
    project_dir: ChildPath,
    root: TempDir,
    filters: Vec<(String, String)>,
}

impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create test root directory");
        let project_dir = root.child("project");
        project_dir
            .create_dir_all()
            .expect("Failed to create project directory");

        let mut filters = Vec::new();
        for pattern in Self::path_patterns(project_dir.path()) {
            filters.push((pattern, "[TEMP_DIR]".to_string()));
        }
        filters.push((
            r"Created workspace `[^`]+`".to_string(),
            "Created workspace `[WORKSPACE]`".to_string(),
        ));
        filters.push((
            r"index [0-9a-f]+\.\.[0-9a-f]+".to_string(),
            "index [HASH]".to_string(),
        ));
        #[cfg(windows)]
        filters.push((r"\\([\w\d.])".to_string(), "/$1".to_string()));

        Self {
            project_dir,
            root,
            filters,
        }
    }

    fn path_patterns(path: &Path) -> Vec<String> {
        let mut patterns = Vec::new();
        if let Ok(canonical) = path.canonicalize() {
            patterns.push(regex::escape(&canonical.display().to_string()));
        }
        patterns.push(regex::escape(&path.display().to_string()));
        patterns.dedup();
        patterns
    }

    pub fn work_dir(&self) -> &ChildPath {
        &self.project_dir
    }

    pub fn filters(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(pattern, replacement)| (pattern.as_str(), replacement.as_str()))
            .collect()
    }

    /// A `hookdrill` invocation rooted in the project directory.
    pub fn command(&self) -> Command {
        let mut command = Command::new(cargo_bin("hookdrill"));
        command.current_dir(self.project_dir.path());
        command.env_remove("HOOKDRILL_PRE_COMMIT");
        command.env_remove("RUST_LOG");
        command
    }

    /// Write the minimal hook configuration and definitions directory.
    pub fn init_project(&self) {
        self.project_dir
            .child(".pre-commit-config.yaml")
            .write_str("repos: []\n")
            .unwrap();
        self.project_dir.child(".pre-commit").create_dir_all().unwrap();
    }

    /// Build a fixture archive at `test/example_files.<suffix>` with
    /// `git archive`, nesting the files under `test_files/`.
    pub fn create_fixture(&self, suffix: &str, files: &[(&str, &str)]) {
        let source = self
            .root
            .child(format!("fixture-src-{}", suffix.replace('.', "-")));
        source.create_dir_all().unwrap();
        for (name, contents) in files {
            source.child(*name).write_str(contents).unwrap();
        }

        let git = |args: &[&str]| {
            let status = Command::new("git")
                .args(args)
                .current_dir(source.path())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .expect("git must be installed");
            assert!(status.success(), "`git {args:?}` failed");
        };
        git(&["init", "-q"]);
        git(&["add", "-A"]);
        git(&[
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=Test User",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "fixture",
        ]);

        let test_dir = self.project_dir.child("test");
        test_dir.create_dir_all().unwrap();
        let archive = test_dir.child(format!("example_files.{suffix}"));
        git(&[
            "archive",
            "--prefix=test_files/",
            &format!("--format={suffix}"),
            "-o",
            &archive.path().display().to_string(),
            "HEAD",
        ]);
    }

    /// Write an executable stub launcher into the project and return its path.
    #[cfg(unix)]
    pub fn write_stub_launcher(&self, script: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let stub = self.project_dir.child("stub.sh");
        stub.write_str(script).unwrap();
        let mut permissions = std::fs::metadata(stub.path()).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(stub.path(), permissions).unwrap();
        stub.path().to_path_buf()
    }
}

#[allow(unused_macros)]
macro_rules! cmd_snapshot {
    ($filters:expr, $cmd:expr, @$snapshot:literal) => {{
        let mut settings = insta::Settings::clone_current();
        for (matcher, replacement) in $filters {
            settings.add_filter(matcher, replacement);
        }
        let _guard = settings.bind_to_scope();
        insta_cmd::assert_cmd_snapshot!($cmd, @$snapshot);
    }};
}

#[allow(unused_imports)]
pub(crate) use cmd_snapshot;
