use crate::command::build_command_line;
use crate::host::ScriptHost;
use crate::outcome::{classify, ExitOutcome};
use crate::platform::{detect_platform, local_os, OsKind};
use crate::script::{render, ScriptConfig};
use anyhow::Result;

/// One PowerShell build step.
///
/// Owns the step configuration for a single invocation and composes the
/// core pieces: render the script, hand it to the execution collaborator,
/// pick the platform-specific command line, launch, classify. Every run
/// renders a fresh script and command line; nothing is shared across
/// invocations.
pub struct PowerShellStep {
    config: ScriptConfig,
    local_os: OsKind,
}

impl PowerShellStep {
    pub fn new(config: ScriptConfig) -> Self {
        Self::with_local_os(config, local_os())
    }

    /// Pin the local OS instead of probing it, for callers (and tests)
    /// that need determinism.
    pub fn with_local_os(config: ScriptConfig, local_os: OsKind) -> Self {
        Self { config, local_os }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Command line that would launch a script persisted at `path`.
    pub fn command_line(&self, path: &str, remote: bool) -> Vec<String> {
        let platform = detect_platform(path, remote, self.local_os);
        build_command_line(platform, path, self.config.use_profile)
    }

    /// Execute the step through `host` and classify the exit code.
    pub async fn run(&self, host: &dyn ScriptHost) -> Result<ExitOutcome> {
        let script = render(&self.config, self.local_os);
        let persisted = host.persist(&script)?;
        let argv = self.command_line(&persisted.path, persisted.remote);
        let exit_code = host.launch(&argv)?;
        Ok(classify(exit_code, self.config.unstable_return()))
    }

    /// Persist the script and report the command line that [`run`] would
    /// launch, without launching it.
    ///
    /// [`run`]: PowerShellStep::run
    pub async fn dry_run(&self, host: &dyn ScriptHost) -> Result<Vec<String>> {
        let script = render(&self.config, self.local_os);
        let persisted = host.persist(&script)?;
        Ok(self.command_line(&persisted.path, persisted.remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostError, PersistedScript};
    use crate::script::RenderedScript;
    use std::cell::RefCell;

    struct FakeHost {
        path: String,
        remote: bool,
        exit_code: i32,
        persisted: RefCell<Option<RenderedScript>>,
        launched: RefCell<Option<Vec<String>>>,
    }

    impl FakeHost {
        fn new(path: &str, remote: bool, exit_code: i32) -> Self {
            Self {
                path: path.to_string(),
                remote,
                exit_code,
                persisted: RefCell::new(None),
                launched: RefCell::new(None),
            }
        }
    }

    impl ScriptHost for FakeHost {
        fn persist(&self, script: &RenderedScript) -> Result<PersistedScript, HostError> {
            *self.persisted.borrow_mut() = Some(script.clone());
            Ok(PersistedScript {
                path: self.path.clone(),
                remote: self.remote,
            })
        }

        fn launch(&self, argv: &[String]) -> Result<i32, HostError> {
            *self.launched.borrow_mut() = Some(argv.to_vec());
            Ok(self.exit_code)
        }
    }

    fn config(unstable_return: Option<i32>) -> ScriptConfig {
        ScriptConfig {
            command: "Get-Item .".to_string(),
            stop_on_error: true,
            use_profile: false,
            unstable_return,
        }
    }

    #[tokio::test]
    async fn run_renders_launches_and_classifies() {
        let host = FakeHost::new("/ws/step.ps1", false, 0);
        let step = PowerShellStep::with_local_os(config(None), OsKind::Posix);

        let outcome = step.run(&host).await.unwrap();
        assert_eq!(outcome, ExitOutcome::Success);

        let persisted = host.persisted.borrow().clone().unwrap();
        assert_eq!(persisted.extension, ".ps1");
        assert_eq!(
            persisted.text,
            "$ErrorActionPreference=\"Stop\"\nGet-Item .\nexit $LastExitCode"
        );

        let launched = host.launched.borrow().clone().unwrap();
        assert_eq!(
            launched,
            vec![
                "pwsh",
                "-NonInteractive",
                "-NoProfile",
                "-File",
                "/ws/step.ps1",
            ]
        );
    }

    #[tokio::test]
    async fn run_picks_windows_invocation_for_remote_drive_path() {
        let host = FakeHost::new(r"C:\ws\step.ps1", true, 0);
        let step = PowerShellStep::with_local_os(config(None), OsKind::Posix);

        step.run(&host).await.unwrap();

        let launched = host.launched.borrow().clone().unwrap();
        assert_eq!(launched[0], "powershell.exe");
        assert_eq!(launched.last().map(String::as_str), Some(r"C:\ws\step.ps1"));
    }

    #[tokio::test]
    async fn run_classifies_matching_exit_code_as_unstable() {
        let host = FakeHost::new("/ws/step.ps1", false, 3);
        let step = PowerShellStep::with_local_os(config(Some(3)), OsKind::Posix);
        assert_eq!(step.run(&host).await.unwrap(), ExitOutcome::Unstable);
    }

    #[tokio::test]
    async fn run_classifies_other_exit_codes_as_failure() {
        let host = FakeHost::new("/ws/step.ps1", false, 7);
        let step = PowerShellStep::with_local_os(config(Some(3)), OsKind::Posix);
        assert_eq!(step.run(&host).await.unwrap(), ExitOutcome::Failure);
    }

    #[tokio::test]
    async fn zero_threshold_never_marks_unstable() {
        let host = FakeHost::new("/ws/step.ps1", false, 5);
        let step = PowerShellStep::with_local_os(config(Some(0)), OsKind::Posix);
        assert_eq!(step.run(&host).await.unwrap(), ExitOutcome::Failure);
    }

    #[tokio::test]
    async fn dry_run_persists_but_does_not_launch() {
        let host = FakeHost::new("/ws/step.ps1", false, 0);
        let step = PowerShellStep::with_local_os(config(None), OsKind::Posix);

        let argv = step.dry_run(&host).await.unwrap();
        assert_eq!(argv[0], "pwsh");
        assert!(host.persisted.borrow().is_some());
        assert!(host.launched.borrow().is_none());
    }
}
