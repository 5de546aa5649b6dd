/// OS family of the machine this process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Windows,
    Posix,
}

/// OS family of the machine a script will execute on.
///
/// Derived per invocation from the script's target path; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Windows,
    Posix,
}

/// The local machine's OS family. Callers pass this into
/// [`detect_platform`] so the detection itself stays free of ambient state.
pub fn local_os() -> OsKind {
    if cfg!(windows) {
        OsKind::Windows
    } else {
        OsKind::Posix
    }
}

/// Decide whether the script at `script_path` will run on a Windows-like
/// or POSIX-like machine.
///
/// For a local path the local OS is authoritative. For a remote path no OS
/// signal is available, so we guess from the path shape: something like
/// `C:\...` is Windows, everything else is POSIX. The guess can be wrong
/// for unusual paths; that is an accepted accuracy limit, not an error.
pub fn detect_platform(script_path: &str, is_remote: bool, local_os: OsKind) -> PlatformKind {
    if !is_remote {
        return match local_os {
            OsKind::Windows => PlatformKind::Windows,
            OsKind::Posix => PlatformKind::Posix,
        };
    }

    let bytes = script_path.as_bytes();
    if bytes.len() > 3 && bytes[1] == b':' && bytes[2] == b'\\' {
        PlatformKind::Windows
    } else {
        PlatformKind::Posix
    }
}
