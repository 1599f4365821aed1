//! Runner module for invoking the external DCP-o-matic command-line tools.
//!
//! A [`Runner`] owns the resolved location of one executable and exposes a
//! uniform execute/run/version contract over it. Binary lookup goes through a
//! [`Resolve`] implementation and process creation through a [`Spawn`]
//! implementation, so both can be swapped out without touching global state.
//!
//! Only the exit code decides success. Nothing the tool writes is parsed back.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::utils::get_binary_path;

/// Argument used to ask a tool for its version.
pub const VERSION_FLAG: &str = "--version";

/// Exit code reported when the process was terminated by a signal.
const SIGNAL_EXIT_CODE: i32 = -1;

/// Maps a logical binary name to a filesystem path.
pub trait Resolve {
    /// Return the location of `name`, or `None` if it cannot be found.
    fn which(&self, name: &str) -> Option<PathBuf>;
}

/// Resolver that searches the directories listed in `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup;

impl Resolve for PathLookup {
    fn which(&self, name: &str) -> Option<PathBuf> {
        get_binary_path(&[name])
    }
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn which(&self, name: &str) -> Option<PathBuf> {
        self(name)
    }
}

/// Raw information about a completed process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Starts a program, waits for it and captures its output.
pub trait Spawn {
    /// Run `program` with `args` to completion.
    ///
    /// Errors are reserved for failures to start or wait on the process; a
    /// non-zero exit is reported through [`ProcessOutput::code`].
    fn spawn(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput>;
}

/// Spawner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl Spawn for SystemSpawner {
    fn spawn(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of a successful tool invocation.
///
/// `output_path` is whatever the caller told the tool to write to. It is not
/// checked against what the tool actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliResult {
    /// Where the tool was asked to write its output.
    pub output_path: PathBuf,
    /// Always `true` for values returned by [`Runner::run`].
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Handle on one resolved external executable.
#[derive(Debug, Clone)]
pub struct Runner<S = SystemSpawner> {
    binary_name: String,
    binary_path: PathBuf,
    spawner: S,
}

impl Runner {
    /// Resolve `binary_name`, preferring `binary_path` when given and
    /// falling back to a `PATH` search.
    pub fn new(binary_name: &str, binary_path: Option<&Path>) -> Result<Self> {
        Self::with_resolver(binary_name, binary_path, &PathLookup)
    }

    /// Same as [`Runner::new`] with a caller-provided resolver.
    ///
    /// The resolver is only consulted when no explicit path is given.
    pub fn with_resolver<R>(
        binary_name: &str,
        binary_path: Option<&Path>,
        resolver: &R,
    ) -> Result<Self>
    where
        R: Resolve + ?Sized,
    {
        let resolved = match binary_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::BinaryNotFound {
                        binary: binary_name.to_string(),
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            None => resolver
                .which(binary_name)
                .ok_or_else(|| Error::BinaryNotInPath(binary_name.to_string()))?,
        };
        debug!("Resolved {} to {}", binary_name, resolved.display());

        Ok(Self {
            binary_name: binary_name.to_string(),
            binary_path: resolved,
            spawner: SystemSpawner,
        })
    }
}

impl<S> Runner<S> {
    /// Replace the spawner, keeping the resolved binary.
    pub fn with_spawner<T: Spawn>(self, spawner: T) -> Runner<T> {
        Runner {
            binary_name: self.binary_name,
            binary_path: self.binary_path,
            spawner,
        }
    }

    /// Logical name the binary was resolved from.
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// Resolved location of the binary.
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

impl<S: Spawn> Runner<S> {
    /// Spawn the binary with `args` and wait for it to exit.
    ///
    /// The exit code is not inspected. `error_label` prefixes the message if
    /// the process cannot be started.
    pub fn execute<I, A>(&self, args: I, error_label: &str) -> Result<ProcessOutput>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();
        debug!("Running {}", render_command(&self.binary_path, &args));

        let output = self
            .spawner
            .spawn(&self.binary_path, &args)
            .map_err(|source| Error::Spawn {
                label: error_label.to_string(),
                source,
            })?;
        trace!("{} exited with {:?}", self.binary_name, output.code);

        Ok(output)
    }

    /// Spawn the binary and require a zero exit code.
    pub fn run<I, A>(
        &self,
        args: I,
        output_path: impl Into<PathBuf>,
        error_label: &str,
    ) -> Result<CliResult>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let output = self.execute(args, error_label)?;

        if !output.success() {
            let code = match output.code {
                Some(code) => code,
                None => {
                    warn!("{} was terminated by a signal", self.binary_name);
                    SIGNAL_EXIT_CODE
                }
            };
            return Err(Error::ToolFailure {
                label: error_label.to_string(),
                code,
                stderr: output.stderr,
            });
        }

        Ok(CliResult {
            output_path: output_path.into(),
            success: true,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Ask the binary for its version string.
    ///
    /// A non-zero exit from `--version` is not treated as an error; whatever
    /// was printed to stdout is returned.
    pub fn version(&self) -> Result<String> {
        let output = self.execute([VERSION_FLAG], "Version check")?;
        Ok(output.stdout.trim().to_string())
    }
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
