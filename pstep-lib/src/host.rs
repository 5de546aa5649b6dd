use crate::script::RenderedScript;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;
use thiserror::Error;

/// Failures originating in the execution collaborator. The core decision
/// logic itself is total; these are the only genuine failure modes.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("script file could not be created: {0}")]
    Persist(#[from] std::io::Error),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("process terminated by a signal before reporting an exit code")]
    KilledBySignal,

    #[error("empty command line")]
    EmptyCommandLine,
}

/// Where the collaborator put the script, and whether that path lives on a
/// remote worker. Platform detection runs against this.
#[derive(Debug, Clone)]
pub struct PersistedScript {
    pub path: String,
    pub remote: bool,
}

/// The execution collaborator: persists rendered script text as an
/// executable file and launches argument vectors, reporting the process
/// exit code. Scheduling, transport, and cancellation live behind this
/// seam, not in the core.
pub trait ScriptHost {
    fn persist(&self, script: &RenderedScript) -> Result<PersistedScript, HostError>;

    fn launch(&self, argv: &[String]) -> Result<i32, HostError>;
}

/// Runs scripts on the local machine. Scripts are persisted into a scratch
/// directory that lives as long as the host does.
pub struct LocalHost {
    scratch: TempDir,
    cwd: Option<PathBuf>,
}

impl LocalHost {
    pub fn new() -> Result<Self, HostError> {
        Self::with_cwd(None)
    }

    pub fn with_cwd(cwd: Option<PathBuf>) -> Result<Self, HostError> {
        Ok(Self {
            scratch: TempDir::new()?,
            cwd,
        })
    }
}

impl ScriptHost for LocalHost {
    fn persist(&self, script: &RenderedScript) -> Result<PersistedScript, HostError> {
        let path = self.scratch.path().join(format!("step{}", script.extension));
        std::fs::write(&path, &script.text)?;
        Ok(PersistedScript {
            path: path.to_string_lossy().into_owned(),
            remote: false,
        })
    }

    fn launch(&self, argv: &[String]) -> Result<i32, HostError> {
        let (program, args) = argv.split_first().ok_or(HostError::EmptyCommandLine)?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        // Stream stdio so build output shows up in real time.
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| HostError::Launch {
                program: program.clone(),
                source,
            })?;

        status.code().ok_or(HostError::KilledBySignal)
    }
}
