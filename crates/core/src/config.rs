use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scene::SceneConfig;

/// Where the DMX values come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Endpoint without the query string, e.g. `http://localhost:9090/get_dmx`
    pub endpoint: String,
    pub universe: u16,
    /// Per-request timeout. An expired request counts as a failed fetch.
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9090/get_dmx".to_string(),
            universe: 1,
            timeout_ms: 250,
        }
    }
}

/// How the frame loop obtains channel data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PollMode {
    /// Fetch synchronously inside each frame tick, bounded by the timeout
    #[default]
    Blocking,
    /// Fetch on a separate thread and read the latest buffer each tick
    Background,
}

impl FromStr for PollMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blocking" => Ok(PollMode::Blocking),
            "background" => Ok(PollMode::Background),
            other => Err(format!(
                "Unknown poll mode '{}', expected 'blocking' or 'background'",
                other
            )),
        }
    }
}

impl fmt::Display for PollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollMode::Blocking => write!(f, "blocking"),
            PollMode::Background => write!(f, "background"),
        }
    }
}

/// Everything the visualizer needs at startup. Built once, then only read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub target_fps: u32,
    pub poll_mode: PollMode,
    pub source: SourceConfig,
    pub scene: SceneConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 30,
            poll_mode: PollMode::default(),
            source: SourceConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

/// Configuration manager for Stagelight settings.
/// Settings are persisted as versioned JSON, `stagelight.json` in the working
/// directory by default.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
    created_at: Option<String>,
}

/// Available configuration options with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub general: GeneralConfigSchema,
    pub source: SourceConfigSchema,
    pub stage: StageConfigSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfigSchema {
    pub target_fps: ConfigOption<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfigSchema {
    pub timeout_ms: ConfigOption<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfigSchema {
    pub num_lights: ConfigOption<usize>,
    pub beam_speed: ConfigOption<u32>,
    pub max_beam_width: ConfigOption<f32>,
}

/// Configuration option with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub description: String,
}

/// Persisted configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub settings: Settings,
    pub created_at: String,
    pub modified_at: String,
}

impl ConfigManager {
    /// Create a new configuration manager.
    /// If no path is provided, defaults to 'stagelight.json' in the current working directory
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("stagelight.json"));

        Self {
            config_path,
            settings: Settings::default(),
            created_at: None,
        }
    }

    /// Load settings from the configuration file.
    /// Writes the defaults out if the file doesn't exist yet.
    pub fn load(&mut self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            self.save()?;
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config_file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config_file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Config file version {} doesn't match application version {}. Using defaults for new settings.",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        self.settings = config_file.settings;
        self.created_at = Some(config_file.created_at);
        Ok(self.settings.clone())
    }

    /// Save current settings to the configuration file
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let config_file = ConfigFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings: self.settings.clone(),
            created_at: self.created_at.clone().unwrap_or_else(|| now.clone()),
            modified_at: now,
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Validate, then update settings and save to file
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        Self::validate_settings(&settings).map_err(ConfigError::ValidationError)?;
        self.settings = settings;
        self.save()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get configuration schema with available options
    pub fn schema() -> ConfigSchema {
        let defaults = Settings::default();
        ConfigSchema {
            general: GeneralConfigSchema {
                target_fps: ConfigOption {
                    default: defaults.target_fps,
                    valid_range: Some((1, 120)),
                    description: "Frame loop rate in frames per second".to_string(),
                },
            },
            source: SourceConfigSchema {
                timeout_ms: ConfigOption {
                    default: defaults.source.timeout_ms,
                    valid_range: Some((1, 10_000)),
                    description: "Timeout for a single DMX fetch in milliseconds".to_string(),
                },
            },
            stage: StageConfigSchema {
                num_lights: ConfigOption {
                    default: defaults.scene.layout.num_lights,
                    valid_range: Some((1, 102)),
                    description: "Number of fixtures (5 channels each, one universe)"
                        .to_string(),
                },
                beam_speed: ConfigOption {
                    default: defaults.scene.layout.beam_speed,
                    valid_range: Some((1, 600)),
                    description: "Vertical step between beam segments in pixels".to_string(),
                },
                max_beam_width: ConfigOption {
                    default: defaults.scene.layout.max_beam_width,
                    valid_range: Some((0.0, 400.0)),
                    description: "Widest a beam segment may get in pixels".to_string(),
                },
            },
        }
    }

    /// Validate settings against schema
    pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let schema = Self::schema();
        let layout = &settings.scene.layout;

        if let Some((min, max)) = schema.general.target_fps.valid_range {
            if settings.target_fps < min || settings.target_fps > max {
                errors.push(format!("target_fps must be between {} and {}", min, max));
            }
        }

        if let Some((min, max)) = schema.source.timeout_ms.valid_range {
            if settings.source.timeout_ms < min || settings.source.timeout_ms > max {
                errors.push(format!("timeout_ms must be between {} and {}", min, max));
            }
        }

        if settings.source.endpoint.trim().is_empty() {
            errors.push("endpoint must not be empty".to_string());
        }

        if let Some((min, max)) = schema.stage.num_lights.valid_range {
            if layout.num_lights < min || layout.num_lights > max {
                errors.push(format!("num_lights must be between {} and {}", min, max));
            }
        }

        if let Some((min, max)) = schema.stage.beam_speed.valid_range {
            if layout.beam_speed < min || layout.beam_speed > max {
                errors.push(format!("beam_speed must be between {} and {}", min, max));
            }
        }

        if let Some((min, max)) = schema.stage.max_beam_width.valid_range {
            if !(min..=max).contains(&layout.max_beam_width) {
                errors.push(format!("max_beam_width must be between {} and {}", min, max));
            }
        }

        if layout.stage_width > layout.screen_width {
            errors.push("stage_width must not exceed screen_width".to_string());
        }

        if layout.stage_height > layout.screen_height {
            errors.push("stage_height must not exceed screen_height".to_string());
        }

        if layout.light_radius > layout.screen_height {
            errors.push("light_radius must not exceed screen_height".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::WriteError(msg) => write!(f, "Failed to write config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::SerializeError(msg) => write!(f, "Failed to serialize config: {}", msg),
            ConfigError::ValidationError(errors) => {
                write!(f, "Config validation errors: {}", errors.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
