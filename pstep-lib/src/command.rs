use crate::platform::PlatformKind;

/// Build the argument vector that launches the interpreter on the script
/// at `script_path`. Token 0 is the interpreter binary; flag order is
/// significant and is passed to process creation unmodified.
///
/// Note the ordering asymmetry: without a profile, `-NoProfile` comes
/// first on Windows but after `-NonInteractive` on POSIX. That mirrors the
/// interpreters' own command-line parsing quirks and must not be
/// normalized.
pub fn build_command_line(
    platform: PlatformKind,
    script_path: &str,
    use_profile: bool,
) -> Vec<String> {
    let flags: &[&str] = match (platform, use_profile) {
        (PlatformKind::Windows, true) => &[
            "powershell.exe",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-File",
        ],
        (PlatformKind::Windows, false) => &[
            "powershell.exe",
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-File",
        ],
        // The ExecutionPolicy option does not work (and is not required)
        // on non-Windows builds of PowerShell.
        // See https://github.com/PowerShell/PowerShell/issues/2742
        (PlatformKind::Posix, true) => &["pwsh", "-NonInteractive", "-File"],
        (PlatformKind::Posix, false) => &["pwsh", "-NonInteractive", "-NoProfile", "-File"],
    };

    let mut argv: Vec<String> = flags.iter().map(|s| s.to_string()).collect();
    argv.push(script_path.to_string());
    argv
}
