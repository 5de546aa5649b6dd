pub mod adapter;
pub mod command;
pub mod config;
pub mod host;
pub mod outcome;
pub mod platform;
pub mod script;

pub use adapter::PowerShellStep;
pub use command::build_command_line;
pub use config::Config;
pub use host::{HostError, LocalHost, PersistedScript, ScriptHost};
pub use outcome::{classify, ExitOutcome};
pub use platform::{detect_platform, local_os, OsKind, PlatformKind};
pub use script::{render, RenderedScript, ScriptConfig, SCRIPT_EXTENSION};
