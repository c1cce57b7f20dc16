//! User configuration.
//!
//! Everything user-specific lives under one application directory inside the
//! config root (`$XDG_CONFIG_HOME`, or the platform config directory when that
//! is unset):
//!
//! ```text
//! ~/.config/timelapse/
//! ├── config.toml              # Defaults for the CLI (optional)
//! └── framespecs/
//!     ├── editor.json          # `timelapse clean editor <source>`
//!     └── browser.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [clean]
//! destination = "rejected"  # Where rejected frames are moved
//!
//! [compile]
//! destination = "clips"     # Where clips are written
//! framerate = 20            # Frames per second of each clip
//! crf = 20                  # x264 constant rate factor (0-51, lower = better)
//! pad_frames = 60           # Length of the padding clip, in frames at 1 fps
//! ffmpeg = "ffmpeg"         # Transcoder program
//! ```
//!
//! Command-line flags override these values. Unknown keys are rejected to
//! catch typos early.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name of the application inside the config root.
pub const APP_DIR: &str = "timelapse";

const CONFIG_FILENAME: &str = "config.toml";
const FRAMESPECS_DIR: &str = "framespecs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelapseConfig {
    /// Defaults for `timelapse clean`.
    pub clean: CleanConfig,
    /// Defaults for `timelapse compile`.
    pub compile: CompileConfig,
}

impl TimelapseConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compile.framerate == 0 {
            return Err(ConfigError::Validation(
                "compile.framerate must be non-zero".into(),
            ));
        }
        if self.compile.crf > 51 {
            return Err(ConfigError::Validation("compile.crf must be 0-51".into()));
        }
        if self.compile.pad_frames == 0 {
            return Err(ConfigError::Validation(
                "compile.pad_frames must be non-zero".into(),
            ));
        }
        if self.compile.ffmpeg.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compile.ffmpeg must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanConfig {
    /// Rejection directory used when `--destination` is not given.
    pub destination: PathBuf,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Clip directory used when `--destination` is not given.
    pub destination: PathBuf,
    /// Frames per second of each sequence clip.
    pub framerate: u32,
    /// x264 constant rate factor.
    pub crf: u32,
    /// Number of copies of the final frame in the padding clip.
    pub pad_frames: u32,
    /// Program invoked to encode clips.
    pub ffmpeg: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("clips"),
            framerate: 20,
            crf: 20,
            pad_frames: 60,
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

/// The user's config root: `$XDG_CONFIG_HOME` when set, else the platform
/// config directory.
pub fn config_root() -> Option<PathBuf> {
    config_root_from(std::env::var_os("XDG_CONFIG_HOME"))
}

fn config_root_from(xdg_config_home: Option<OsString>) -> Option<PathBuf> {
    xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

/// `<root>/timelapse`
pub fn app_dir(root: &Path) -> PathBuf {
    root.join(APP_DIR)
}

/// `<root>/timelapse/framespecs`
pub fn framespecs_dir(root: &Path) -> PathBuf {
    app_dir(root).join(FRAMESPECS_DIR)
}

/// Load `<root>/timelapse/config.toml`, falling back to defaults when the
/// root is unknown or the file does not exist.
pub fn load_config(root: Option<&Path>) -> Result<TimelapseConfig, ConfigError> {
    let Some(root) = root else {
        return Ok(TimelapseConfig::default());
    };
    let path = app_dir(root).join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(TimelapseConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: TimelapseConfig =
        toml::from_str(&content).map_err(|source| ConfigError::Toml { path, source })?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Timelapse Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Location: $XDG_CONFIG_HOME/timelapse/config.toml
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Frame validation (`timelapse clean`)
# ---------------------------------------------------------------------------
[clean]
# Directory rejected frames are moved into, unless --delete is given.
destination = "rejected"

# ---------------------------------------------------------------------------
# Clip compilation (`timelapse compile`)
# ---------------------------------------------------------------------------
[compile]
# Directory the clips are written to.
destination = "clips"

# Frames per second of each sequence clip.
framerate = 20

# x264 constant rate factor, 0-51. Lower is better quality and larger files.
crf = 20

# The padding clip repeats the final frame this many times at 1 fps.
pad_frames = 60

# Program used to encode clips.
ffmpeg = "ffmpeg"
"##
}
