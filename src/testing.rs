//! Test doubles shared by the unit tests.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::runner::{ProcessOutput, Runner, Spawn};

/// Path every fake runner resolves to.
pub(crate) const FAKE_BINARY: &str = "/usr/bin/fake_binary";

#[derive(Debug, Clone)]
enum Reply {
    Exit(ProcessOutput),
    SpawnError(String),
}

/// Spawner that records every command line and answers with a canned reply.
///
/// Clones share the same call log, so a test can hand one clone to a runner
/// and inspect the other.
#[derive(Debug, Clone)]
pub(crate) struct MockSpawner {
    reply: Reply,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockSpawner {
    pub(crate) fn ok() -> Self {
        Self::exit(Some(0), "", "")
    }

    pub(crate) fn exit(code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        Self::with_reply(Reply::Exit(ProcessOutput {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }))
    }

    pub(crate) fn spawn_error(message: &str) -> Self {
        Self::with_reply(Reply::SpawnError(message.to_string()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every recorded command line, program first.
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    /// Arguments of the only recorded call, program excluded.
    pub(crate) fn single_call_args(&self) -> Vec<String> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one spawn, got {calls:?}");
        calls[0][1..].to_vec()
    }
}

impl Spawn for MockSpawner {
    fn spawn(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        let mut line = vec![program.display().to_string()];
        line.extend(args.iter().map(|arg| arg.to_string_lossy().into_owned()));
        self.calls.lock().expect("call log poisoned").push(line);

        match &self.reply {
            Reply::Exit(output) => Ok(output.clone()),
            Reply::SpawnError(message) => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                message.clone(),
            )),
        }
    }
}

/// Runner resolved to [`FAKE_BINARY`] that spawns through `spawner`.
pub(crate) fn fake_runner(spawner: &MockSpawner) -> Runner<MockSpawner> {
    let resolver = |_: &str| -> Option<PathBuf> { Some(PathBuf::from(FAKE_BINARY)) };
    Runner::with_resolver("fake_binary", None, &resolver)
        .expect("fake binary resolves")
        .with_spawner(spawner.clone())
}
