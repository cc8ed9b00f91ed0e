use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Directory to change into before anything else
    pub chdir: Option<PathBuf>,
    /// Erase the fan and title when done instead of ending the line
    pub clean: bool,
    /// Expected total run time in seconds; 0 disables the countdown
    pub duration_secs: u64,
    /// Redraw on every Nth input line
    pub sample_every: u64,
    /// Copy every input line to the fan output
    pub echo: bool,
    /// Never draw the fan
    pub quiet: bool,
    /// Explicit run record file
    pub record: Option<PathBuf>,
    /// Rewrite the run record even when one already exists
    pub overwrite_record: bool,
    /// Expected input line count; 0 disables the percentage
    pub target_lines: u64,
    /// Title printed before the fan; `-` means the command line
    pub title: Option<String>,
    /// Where records derived from a command line are kept
    pub record_dir: PathBuf,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            chdir: None,
            clean: false,
            duration_secs: 0,
            sample_every: 1,
            echo: false,
            quiet: false,
            record: None,
            overwrite_record: false,
            target_lines: 0,
            title: None,
            record_dir: PathBuf::from(".linefan"),
        }
    }
}

pub fn load_config(path: Option<&std::path::Path>) -> Result<FanConfig> {
    let config = if let Some(config_path) = path {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

            toml::from_str::<FanConfig>(&contents)
                .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?
        } else {
            #[cfg(not(test))]
            tracing::warn!("Config file not found at {:?}, using defaults", config_path);
            FanConfig::default()
        }
    } else {
        #[cfg(not(test))]
        tracing::debug!("No config path provided, using defaults");
        FanConfig::default()
    };

    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &FanConfig) -> Result<()> {
    if config.sample_every == 0 {
        anyhow::bail!("sample_every must be at least 1");
    }

    if config.record_dir.as_os_str().is_empty() {
        anyhow::bail!("record_dir cannot be empty");
    }

    Ok(())
}

/// Title to print for a run of `command`
///
/// `-` stands for the command line itself when there is one.
pub fn resolve_title(title: Option<&str>, command: Option<&str>) -> Option<String> {
    match (title, command) {
        (None, _) => None,
        (Some(""), _) => None,
        (Some("-"), Some(command)) => Some(command.to_string()),
        (Some(title), _) => Some(title.to_string()),
    }
}
