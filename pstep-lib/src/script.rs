use crate::platform::OsKind;
use serde::{Deserialize, Serialize};

/// File suffix the execution collaborator must give the persisted script
/// so PowerShell accepts it with `-File`.
pub const SCRIPT_EXTENSION: &str = ".ps1";

/// Configuration for one PowerShell build step.
///
/// Immutable once constructed; one value per step execution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptConfig {
    pub command: String,

    #[serde(default)]
    pub stop_on_error: bool,

    /// Load the user's PowerShell profile (omits `-NoProfile`).
    #[serde(default)]
    pub use_profile: bool,

    #[serde(default)]
    pub unstable_return: Option<i32>,
}

impl ScriptConfig {
    /// The unstable-return threshold, with `Some(0)` normalized to `None`:
    /// 0 is the canonical success code and can never mark a build unstable.
    pub fn unstable_return(&self) -> Option<i32> {
        match self.unstable_return {
            Some(0) | None => None,
            other => other,
        }
    }
}

/// Final script-file contents plus the suffix identifying the file type.
/// Owned by the adapter for the duration of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    pub text: String,
    pub extension: &'static str,
}

/// Render the user's command text into runnable script contents.
///
/// Three lines, joined by the local OS newline:
///  1. `$ErrorActionPreference` directive (`Stop` or `Continue`),
///  2. the command text verbatim (the interpreter owns its semantics),
///  3. `exit $LastExitCode`.
///
/// The trailing exit is required: the pwsh process exit code does not
/// reflect command failures on its own, so the script forwards
/// `$LastExitCode` as the OS-level exit code.
pub fn render(cfg: &ScriptConfig, os: OsKind) -> RenderedScript {
    let newline = match os {
        OsKind::Windows => "\r\n",
        OsKind::Posix => "\n",
    };
    let preference = if cfg.stop_on_error { "Stop" } else { "Continue" };

    let text = format!(
        "$ErrorActionPreference=\"{preference}\"{newline}{command}{newline}exit $LastExitCode",
        command = cfg.command,
    );

    RenderedScript {
        text,
        extension: SCRIPT_EXTENSION,
    }
}
