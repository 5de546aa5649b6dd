use crate::script::ScriptConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults for step settings, loadable from TOML. Unset fields fall
/// through to the next layer of the cascade.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StepDefaults {
    #[serde(default)]
    pub stop_on_error: Option<bool>,

    #[serde(default)]
    pub use_profile: Option<bool>,

    /// 0 means unset, same as omitting the key.
    #[serde(default)]
    pub unstable_return: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub step: StepDefaults,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_cascading(None)
    }

    pub fn load_with_override(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_cascading(config_path)
    }

    fn load_cascading(override_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        // Global config
        if let Some(global_config_path) = Self::global_config_path() {
            if global_config_path.exists() {
                config = config.merge_with(Self::load_from_file(&global_config_path)?);
            }
        }

        // Project-local config
        if let Some(project_config_path) = Self::find_project_config()? {
            config = config.merge_with(Self::load_from_file(&project_config_path)?);
        }

        // Explicit override (highest precedence)
        if let Some(override_path) = override_path {
            if !override_path.exists() {
                return Err(anyhow!(
                    "Config file not found: {}",
                    override_path.display()
                ));
            }
            config = config.merge_with(Self::load_from_file(&override_path)?);
        }

        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pstep").join("pstep.toml"))
    }

    fn find_project_config() -> Result<Option<PathBuf>> {
        let current_dir = std::env::current_dir()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".pstep.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }

        Ok(None)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|err| anyhow!("Invalid config {}: {err}", path.display()))?;
        Ok(config)
    }

    fn merge_with(mut self, other: Self) -> Self {
        if other.step.stop_on_error.is_some() {
            self.step.stop_on_error = other.step.stop_on_error;
        }
        if other.step.use_profile.is_some() {
            self.step.use_profile = other.step.use_profile;
        }
        if other.step.unstable_return.is_some() {
            self.step.unstable_return = other.step.unstable_return;
        }
        self
    }

    /// Resolve one step's configuration: CLI-supplied values win, then the
    /// config cascade, then built-in defaults.
    pub fn script_config(
        &self,
        command: String,
        stop_on_error: Option<bool>,
        use_profile: Option<bool>,
        unstable_return: Option<i32>,
    ) -> ScriptConfig {
        ScriptConfig {
            command,
            stop_on_error: stop_on_error
                .or(self.step.stop_on_error)
                .unwrap_or(false),
            use_profile: use_profile.or(self.step.use_profile).unwrap_or(false),
            unstable_return: unstable_return.or(self.step.unstable_return),
        }
    }
}
