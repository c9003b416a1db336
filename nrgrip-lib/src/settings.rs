//! User settings (`~/.config/nrgrip/settings.toml`).
//!
//! Every key is optional. Each option resolves through the same chain:
//!
//! 1. CLI flag (if given)
//! 2. Value in `settings.toml`
//! 3. Built-in default

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use nrgrip_nero::{ParseOptions, SessionModeCheck};

use crate::audio::OutputFormat;
use crate::error::ExtractError;
use crate::extract::ExtractOptions;

/// Canonical path to the settings file: `~/.config/nrgrip/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("nrgrip").join("settings.toml")
}

/// `[extract]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
    pub include_pregap: Option<bool>,
    pub cue: Option<bool>,
    pub checksum: Option<bool>,
}

/// `[parse]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    pub session_mode_check: Option<SessionModeCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extract: ExtractSettings,
    pub parse: ParseSettings,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
    pub include_pregap: Option<bool>,
    pub cue: Option<bool>,
    pub checksum: Option<bool>,
    pub session_mode_check: Option<SessionModeCheck>,
}

/// Fully resolved settings, as shown by `config show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveSettings {
    pub format: OutputFormat,
    /// `None` means the directory next to each image
    pub output_dir: Option<PathBuf>,
    pub include_pregap: bool,
    pub cue: bool,
    pub checksum: bool,
    pub session_mode_check: SessionModeCheck,
}

impl Settings {
    /// Parse a settings document.
    pub fn from_toml(contents: &str) -> Result<Self, ExtractError> {
        toml::from_str(contents).map_err(|e| ExtractError::settings(e.to_string()))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ExtractError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .map_err(|e| ExtractError::settings(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ExtractError::settings(format!("{}: {}", path.display(), e))),
        }
    }

    /// Load from [`settings_path`].
    pub fn load() -> Result<Self, ExtractError> {
        Self::load_from(&settings_path())
    }

    /// Apply the resolution chain to every option.
    pub fn resolve(&self, cli: &Overrides) -> EffectiveSettings {
        let defaults = ExtractOptions::new("");
        let e = &self.extract;
        EffectiveSettings {
            format: cli.format.or(e.format).unwrap_or(defaults.format),
            output_dir: cli.output_dir.clone().or_else(|| e.output_dir.clone()),
            include_pregap: cli
                .include_pregap
                .or(e.include_pregap)
                .unwrap_or(defaults.include_pregap),
            cue: cli.cue.or(e.cue).unwrap_or(defaults.write_cue),
            checksum: cli.checksum.or(e.checksum).unwrap_or(defaults.checksum),
            session_mode_check: cli
                .session_mode_check
                .or(self.parse.session_mode_check)
                .unwrap_or_default(),
        }
    }
}

impl EffectiveSettings {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().session_mode_check(self.session_mode_check)
    }

    /// Extraction options for one image, named after its file stem.
    pub fn extract_options(&self, image: &Path) -> ExtractOptions {
        ExtractOptions {
            base_name: image_stem(image),
            format: self.format,
            include_pregap: self.include_pregap,
            write_cue: self.cue,
            checksum: self.checksum,
        }
    }

    /// Output directory for one image: the configured directory, or a
    /// directory named after the image next to it.
    pub fn output_dir_for(&self, image: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => image
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(image_stem(image)),
        }
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ExtractError> {
        toml::to_string_pretty(self).map_err(|e| ExtractError::settings(e.to_string()))
    }
}

fn image_stem(image: &Path) -> String {
    image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
