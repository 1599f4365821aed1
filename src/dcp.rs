//! DCP module wrapping `dcpomatic2_cli`.
//!
//! Turns a DCP-o-matic project into a Digital Cinema Package, optionally
//! encrypted.

use std::ffi::OsString;
use std::path::Path;

use crate::error::Result;
use crate::runner::{CliResult, Runner, Spawn, SystemSpawner};
use crate::utils::{ensure_dir, require_exists};

/// Name of the DCP packaging binary.
pub const DCPOMATIC_CLI: &str = "dcpomatic2_cli";

/// Creates DCPs from DCP-o-matic projects.
#[derive(Debug, Clone)]
pub struct DcpCreator<S = SystemSpawner> {
    runner: Runner<S>,
}

impl DcpCreator {
    /// Locate `dcpomatic2_cli` at `binary_path`, or on `PATH` if `None`.
    pub fn new(binary_path: Option<&Path>) -> Result<Self> {
        Ok(Self::from_runner(Runner::new(DCPOMATIC_CLI, binary_path)?))
    }
}

impl<S: Spawn> DcpCreator<S> {
    /// Wrap an already resolved runner.
    pub fn from_runner(runner: Runner<S>) -> Self {
        Self { runner }
    }

    /// Underlying runner.
    pub fn runner(&self) -> &Runner<S> {
        &self.runner
    }

    /// Create a DCP from `project` (a `.dcp` project file or directory).
    ///
    /// When `output` is given the directory is created before the tool runs
    /// and becomes the reported output path; otherwise the project path is
    /// reported.
    pub fn create(
        &self,
        project: &Path,
        output: Option<&Path>,
        encrypt: bool,
    ) -> Result<CliResult> {
        require_exists("Project", project)?;

        let mut args: Vec<OsString> = Vec::new();
        if let Some(output) = output {
            ensure_dir(output)?;
            args.push("-o".into());
            args.push(output.into());
        }
        if encrypt {
            args.push("-e".into());
        }
        args.push(project.into());

        info!("Creating DCP from {}", project.display());
        self.runner.run(args, output.unwrap_or(project), "DCP creation")
    }

    /// Version reported by `dcpomatic2_cli`.
    pub fn version(&self) -> Result<String> {
        self.runner.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::testing::{fake_runner, MockSpawner, FAKE_BINARY};

    fn creator(spawner: &MockSpawner) -> DcpCreator<MockSpawner> {
        DcpCreator::from_runner(fake_runner(spawner))
    }

    fn project_dir(root: &Path) -> std::path::PathBuf {
        let project = root.join("project");
        std::fs::create_dir(&project).expect("project dir");
        std::fs::write(project.join("metadata.xml"), "<Metadata/>").expect("metadata");
        project
    }

    #[test]
    fn missing_project_fails_before_spawn() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let spawner = MockSpawner::ok();

        let err = creator(&spawner)
            .create(&tmp.path().join("missing"), None, false)
            .expect_err("missing project");

        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(err.to_string().starts_with("Project not found"));
        assert!(spawner.calls().is_empty());
    }

    #[test]
    fn project_only_reports_project_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let project = project_dir(tmp.path());
        let spawner = MockSpawner::ok();

        let result = creator(&spawner)
            .create(&project, None, false)
            .expect("create");

        assert_eq!(spawner.single_call_args(), vec![project.display().to_string()]);
        assert!(result.success);
        assert_eq!(result.output_path, project);
    }

    #[test]
    fn output_and_encrypt_flags_precede_project() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let project = project_dir(tmp.path());
        let output = tmp.path().join("dcps").join("feature");
        let spawner = MockSpawner::ok();

        let result = creator(&spawner)
            .create(&project, Some(output.as_path()), true)
            .expect("create");

        assert_eq!(
            spawner.single_call_args(),
            vec![
                "-o".to_string(),
                output.display().to_string(),
                "-e".to_string(),
                project.display().to_string(),
            ]
        );
        assert!(output.is_dir());
        assert_eq!(result.output_path, output);
    }

    #[test]
    fn tool_failure_keeps_created_output_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let project = project_dir(tmp.path());
        let output = tmp.path().join("out");
        let spawner = MockSpawner::exit(Some(1), "", "Could not find film");

        let err = creator(&spawner)
            .create(&project, Some(output.as_path()), false)
            .expect_err("tool fails");

        match err {
            Error::ToolFailure { label, code, stderr } => {
                assert_eq!(label, "DCP creation");
                assert_eq!(code, 1);
                assert_eq!(stderr, "Could not find film");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(output.is_dir());
    }

    #[test]
    fn version_delegates_to_runner() {
        let spawner = MockSpawner::exit(Some(0), "DCP-o-matic 2.16.0\n", "");

        assert_eq!(
            creator(&spawner).version().expect("version"),
            "DCP-o-matic 2.16.0"
        );
    }

    #[test]
    fn runner_exposes_resolved_binary() {
        let spawner = MockSpawner::ok();
        let creator = creator(&spawner);

        assert_eq!(creator.runner().binary_path(), Path::new(FAKE_BINARY));
        assert_eq!(creator.runner().binary_name(), "fake_binary");
    }
}
