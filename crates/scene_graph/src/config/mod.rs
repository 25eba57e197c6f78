//! Configuration system
//!
//! Scene graph settings can be loaded from TOML or RON files through the
//! [`Config`] trait; the file extension selects the format.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Semantically invalid settings
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Scene Graph Configuration
///
/// Settings applied when a [`SceneGraph`](crate::scene::SceneGraph) is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Label given to nodes created through `SceneGraph::spawn`
    pub default_label: String,
    /// Number of node slots reserved up front
    pub node_capacity: usize,
    /// Fallback log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            default_label: "Node".to_string(),
            node_capacity: 256,
            log_level: "info".to_string(),
        }
    }

    /// Set the default node label
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    /// Set the number of preallocated node slots
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Set the fallback log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_label.is_empty() {
            return Err(ConfigError::Invalid("Default label cannot be empty".to_string()));
        }

        match self.log_level.to_ascii_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(ConfigError::Invalid(format!("Unknown log level: {}", other))),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SceneConfig {}
