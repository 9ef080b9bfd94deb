use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, EnhanceError, Result},
    params::EnhanceParams,
    session::SessionSettings,
    video::EncoderSettings,
};

/// Main configuration for the underwater enhancer
///
/// Every table is optional; missing tables and keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial slider values
    pub params: EnhanceParams,

    /// Display and window sizes
    pub display: DisplayConfig,

    /// Snapshot and export destinations
    pub output: OutputConfig,

    /// Worker thread settings
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into(),
            _ => EnhanceError::Io(e),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            EnhanceError::Config(ConfigError::ParseFailed { reason, .. }) => {
                ConfigError::ParseFailed {
                    path: path.display().to_string(),
                    reason,
                }
                .into()
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConfigError::ParseFailed {
                path: "<inline>".to_string(),
                reason: e.message().to_string(),
            }
            .into()
        })
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.params.validate().map_err(|e| ConfigError::InvalidValue {
            key: "params".to_string(),
            value: e.to_string(),
        })?;
        self.display.validate()?;
        self.output.validate()?;
        self.processing.validate()?;
        Ok(())
    }

    /// Settings for an interactive session
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            display_size: (self.display.width, self.display.height),
            snapshot_path: self.output.snapshot_path.clone(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width every frame is resized to before enhancement
    pub width: u32,

    /// Height every frame is resized to before enhancement
    pub height: u32,

    pub window_width: u32,
    pub window_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
            window_width: 1600,
            window_height: 1000,
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("display.width", self.width),
            ("display.height", self.height),
            ("display.window_width", self.window_width),
            ("display.window_height", self.window_height),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `s` / `p` write the enhanced still
    pub snapshot_path: PathBuf,

    /// Where the enhanced video is exported
    pub video_path: PathBuf,

    /// Four-character codec tag of the exported video
    pub codec_tag: String,

    /// ffmpeg encoder used for export
    pub encoder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let encoder = EncoderSettings::default();
        Self {
            snapshot_path: PathBuf::from("enhanced_output.png"),
            video_path: PathBuf::from("enhanced_video.mp4"),
            codec_tag: encoder.codec_tag,
            encoder: encoder.encoder,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.codec_tag.len() != 4 || !self.codec_tag.is_ascii() {
            return Err(ConfigError::InvalidValue {
                key: "output.codec_tag".to_string(),
                value: self.codec_tag.clone(),
            }
            .into());
        }

        if self.encoder.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.encoder".to_string(),
                value: self.encoder.clone(),
            }
            .into());
        }

        for (key, path) in [
            ("output.snapshot_path", &self.snapshot_path),
            ("output.video_path", &self.video_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: String::new(),
                }
                .into());
            }
        }

        Ok(())
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            codec_tag: self.codec_tag.clone(),
            encoder: self.encoder.clone(),
        }
    }
}

/// Processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of worker threads for per-pixel work
    pub threads: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl ProcessingConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "processing.threads".to_string(),
                value: self.threads.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.width, 900);
        assert_eq!(config.output.video_path, PathBuf::from("enhanced_video.mp4"));
        assert_eq!(config.output.codec_tag, "mp4v");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("enhancer.toml");
        std::fs::write(&file_path, "[params]\nomega = 0.5\nred_strength = 60\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.params.omega, 0.5);
        assert_eq!(config.params.red_strength, 60);
        assert_eq!(config.params.clahe_clip, 1.2);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut original = Config::default();
        original.params.a_shift = -7;
        original.output.snapshot_path = PathBuf::from("shots/reef.png");

        let text = original.to_toml_string().unwrap();
        let loaded = Config::from_toml_str(&text).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/no/such/enhancer.toml").unwrap_err();
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn test_unreadable_path_is_not_reported_missing() {
        let dir = tempdir().unwrap();
        let err = Config::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, EnhanceError::Io(_)));
        assert!(!err.user_message().contains("not found"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.toml");
        std::fs::write(&file_path, "[params\nomega = ").unwrap();

        let err = Config::from_file(&file_path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.params.omega = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.codec_tag = "mpeg4".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.height = 0;
        assert!(config.validate().is_err());
    }
}
