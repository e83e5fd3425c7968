//! Configuration system
//!
//! Compiler policy and hardware capability profiles can be loaded from TOML or RON
//! files so tools and tests can describe a target device without code.

pub use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::path::Path;

use crate::material::TextureFilterOptions;
use crate::resources::RenderCapabilities;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

#[derive(Debug, Clone, Copy)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
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
}

/// Policy knobs for the script compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Replace an existing resource when a script redefines its name
    pub allow_override: bool,
    /// Split fixed-function passes that use more texture units than the hardware offers
    pub auto_manage_texture_units: bool,
    /// Compile techniques right after a material is translated
    pub compile_materials: bool,
    /// Nesting limit for variables whose values reference other variables
    pub max_variable_depth: usize,
    /// Filtering applied to new texture units
    pub default_filtering: TextureFilterOptions,
    /// Anisotropy applied to new texture units
    pub default_anisotropy: u32,
    /// Variables visible to every compiled script
    pub global_variables: BTreeMap<String, String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            allow_override: false,
            auto_manage_texture_units: true,
            compile_materials: true,
            max_variable_depth: 16,
            default_filtering: TextureFilterOptions::Bilinear,
            default_anisotropy: 1,
            global_variables: BTreeMap::new(),
        }
    }
}

impl Config for CompilerConfig {}

impl CompilerConfig {
    /// Permit duplicate names to replace earlier definitions
    pub fn with_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Add a global variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_variables.insert(name.into(), value.into());
        self
    }
}

/// Complete configuration for a material system instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSystemConfig {
    /// Compiler policy
    pub compiler: CompilerConfig,
    /// Target hardware profile
    pub capabilities: RenderCapabilities,
}

impl Config for MaterialSystemConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Capabilities;

    #[test]
    fn test_compiler_config_defaults() {
        let config = CompilerConfig::default();
        assert!(!config.allow_override);
        assert!(config.auto_manage_texture_units);
        assert_eq!(config.default_filtering, TextureFilterOptions::Bilinear);
    }

    #[test]
    fn test_toml_partial_document_uses_defaults() {
        let text = r#"
            [compiler]
            allow_override = true

            [compiler.global_variables]
            tint = "1 0 0"

            [capabilities]
            num_texture_units = 2
        "#;
        let config: MaterialSystemConfig = toml::from_str(text).unwrap();
        assert!(config.compiler.allow_override);
        assert_eq!(config.compiler.global_variables["tint"], "1 0 0");
        assert_eq!(config.capabilities.num_texture_units, 2);
        assert!(config.capabilities.has_capability(Capabilities::CUBEMAPPING));
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = std::env::temp_dir().join("material_system_config_test.ron");
        let config = MaterialSystemConfig {
            compiler: CompilerConfig::default().with_override(true).with_variable("a", "b"),
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = MaterialSystemConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = CompilerConfig::load_from_file("settings.ini").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_) | ConfigError::UnsupportedFormat(_)));
    }
}
