//! Generator configuration.
//!
//! Load generator settings from TOML or YAML so build scripts can tune the
//! emitted code without touching the declarations.
//!
//! # Examples
//!
//! ```
//! use polystruct_core::{GeneratorConfig, OutputMode};
//!
//! let config = GeneratorConfig::from_toml_str(r#"
//!     derives = ["Clone", "Copy", "Debug", "PartialEq"]
//!     serializable = true
//!     mode = "module_units"
//!
//!     [indent]
//!     spaces = 2
//! "#).unwrap();
//!
//! assert!(config.serializable);
//! assert_eq!(config.mode, OutputMode::ModuleUnits);
//! assert_eq!(config.indent.unit(), "  ");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Attribute name marking a trait as a polymorphic interface.
    pub marker_attribute: String,

    /// Prefix stripped from the interface name to name the merged type.
    pub interface_prefix: String,

    /// Name of the discriminant field on the merged type.
    pub type_id_field: String,

    /// Suffix appended to the merged type name to name the discriminant enum.
    pub type_id_suffix: String,

    /// Derives added to the merged struct next to the mandatory `Default`.
    pub derives: Vec<String>,

    /// Adds `serde` derives to the merged struct and its discriminant.
    pub serializable: bool,

    /// Emits `From` conversions between each variant and the merged type.
    pub emit_from_impls: bool,

    /// Indentation of generated source text.
    pub indent: IndentStyle,

    /// How generated declarations are laid out relative to their sources.
    pub mode: OutputMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker_attribute: "polymorphic_struct".to_string(),
            interface_prefix: "I".to_string(),
            type_id_field: "current_type_id".to_string(),
            type_id_suffix: "TypeId".to_string(),
            derives: vec![
                "Clone".to_string(),
                "Debug".to_string(),
                "PartialEq".to_string(),
            ],
            serializable: false,
            emit_from_impls: true,
            indent: IndentStyle::default(),
            mode: OutputMode::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the output mode.
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the extra derives of the merged struct.
    pub fn with_derives<I, S>(mut self, derives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derives = derives.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the `serde` derives.
    pub fn with_serializable(mut self, serializable: bool) -> Self {
        self.serializable = serializable;
        self
    }

    /// Sets the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Checks that every configured name can appear in generated code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier(&self.marker_attribute) {
            return Err(ConfigError::Invalid(format!(
                "marker_attribute `{}` is not an identifier",
                self.marker_attribute
            )));
        }
        if !is_identifier(&self.type_id_field) {
            return Err(ConfigError::Invalid(format!(
                "type_id_field `{}` is not an identifier",
                self.type_id_field
            )));
        }
        if self.type_id_suffix.is_empty() || !is_identifier(&self.type_id_suffix) {
            return Err(ConfigError::Invalid(format!(
                "type_id_suffix `{}` must be a non-empty identifier fragment",
                self.type_id_suffix
            )));
        }
        if !self.interface_prefix.is_empty() && !is_identifier(&self.interface_prefix) {
            return Err(ConfigError::Invalid(format!(
                "interface_prefix `{}` is not an identifier fragment",
                self.interface_prefix
            )));
        }
        for derive in &self.derives {
            let valid = derive
                .trim_start_matches("::")
                .split("::")
                .all(is_identifier);
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "derive `{}` is not a path",
                    derive
                )));
            }
        }
        if let IndentStyle::Spaces(0) = self.indent {
            return Err(ConfigError::Invalid(
                "indent must use at least one space".to_string(),
            ));
        }
        Ok(())
    }
}

/// Indentation of generated source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    /// One tab per nesting level.
    Tabs,

    /// The given number of spaces per nesting level.
    Spaces(usize),
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

impl IndentStyle {
    /// Returns the text of one indentation level.
    pub fn unit(&self) -> String {
        match self {
            Self::Tabs => "\t".to_string(),
            Self::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Layout of generated declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Generated items share the module of the scanned declarations.
    #[default]
    Inline,

    /// Generated items are grouped into one wrapper module per host module,
    /// with `use` declarations propagated from the sources.
    ModuleUnits,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests;
