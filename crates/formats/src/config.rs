use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment override for [`DashboardConfig::fps`].
pub const FPS_ENV: &str = "DASHBOARD_FPS";

/// Attribute names each view reads from the records.
///
/// The scatterplot uses `x` / `y`; the circle pack uses `group`, `weight`
/// and `color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeBindings {
    pub x: String,
    pub y: String,
    pub group: String,
    pub weight: String,
    pub color: String,
}

impl Default for AttributeBindings {
    fn default() -> Self {
        Self {
            x: "population".to_string(),
            y: "ViolentCrimesPerPop".to_string(),
            group: "state".to_string(),
            weight: "population".to_string(),
            color: "ViolentCrimesPerPop".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub scatterplot: ViewSize,
    pub circle_pack: ViewSize,
    pub bindings: AttributeBindings,
    /// Label of the synthetic hierarchy root.
    pub root_label: String,
    /// Host frame rate used to sample transitions.
    pub fps: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scatterplot: ViewSize::default(),
            circle_pack: ViewSize::default(),
            bindings: AttributeBindings::default(),
            root_label: "root".to_string(),
            fps: 60.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    /// Applies environment overrides. Unparseable values are logged and ignored.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(FPS_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(fps) if fps.is_finite() && fps > 0.0 => self.fps = fps,
                _ => warn!(value = %raw, "ignoring invalid {FPS_ENV}"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, size) in [
            ("scatterplot", self.scatterplot),
            ("circle_pack", self.circle_pack),
        ] {
            if !(size.width.is_finite() && size.width > 0.0)
                || !(size.height.is_finite() && size.height > 0.0)
            {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("size must be positive, got {}x{}", size.width, size.height),
                });
            }
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: format!("must be positive, got {}", self.fps),
            });
        }
        let b = &self.bindings;
        for (field, name) in [
            ("bindings.x", &b.x),
            ("bindings.y", &b.y),
            ("bindings.group", &b.group),
            ("bindings.weight", &b.weight),
            ("bindings.color", &b.color),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "attribute name is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
