use crate::query_builder::MatchClause;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

pub const DEFAULT_TAG_NAME: &str = "json";
pub const DEFAULT_VARIABLE: &str = "flava";
pub const DEFAULT_START_VARIABLE: &str = "start";
pub const DEFAULT_END_VARIABLE: &str = "end";

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref PARAM_PREFIX: Regex = Regex::new(r"^[A-Za-z0-9_]*$").unwrap();
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Naming and templating conventions shared by every composer
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
#[validate(schema(function = "validate_distinct_endpoints"))]
pub struct CompilerConfig {
    /// Tag family that marks bindable fields
    #[validate(custom(function = "validate_identifier"))]
    pub tag_name: String,

    /// Variable for single nodes and for the relationship of an edge
    #[validate(custom(function = "validate_identifier"))]
    pub variable: String,

    #[validate(custom(function = "validate_identifier"))]
    pub start_variable: String,

    #[validate(custom(function = "validate_identifier"))]
    pub end_variable: String,

    /// Prepended to every parameter name
    #[validate(custom(function = "validate_param_prefix"))]
    pub param_prefix: String,

    /// Used whenever a call does not supply its own clause
    pub match_clause: MatchClause,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            start_variable: DEFAULT_START_VARIABLE.to_string(),
            end_variable: DEFAULT_END_VARIABLE.to_string(),
            param_prefix: String::new(),
            match_clause: MatchClause::native_id("id"),
        }
    }
}

impl CompilerConfig {
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overridden by `GRAPHFRAG_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().env_overrides().build()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content.to_string(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Continue building from this configuration
    pub fn into_builder(self) -> CompilerConfigBuilder {
        CompilerConfigBuilder { config: self }
    }
}

/// Layered construction; `build` validates the result
#[derive(Clone, Debug)]
pub struct CompilerConfigBuilder {
    config: CompilerConfig,
}

impl CompilerConfigBuilder {
    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.config.tag_name = tag_name.into();
        self
    }

    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.config.variable = variable.into();
        self
    }

    pub fn start_variable(mut self, start_variable: impl Into<String>) -> Self {
        self.config.start_variable = start_variable.into();
        self
    }

    pub fn end_variable(mut self, end_variable: impl Into<String>) -> Self {
        self.config.end_variable = end_variable.into();
        self
    }

    pub fn param_prefix(mut self, param_prefix: impl Into<String>) -> Self {
        self.config.param_prefix = param_prefix.into();
        self
    }

    pub fn match_clause(mut self, match_clause: MatchClause) -> Self {
        self.config.match_clause = match_clause;
        self
    }

    /// Apply any `GRAPHFRAG_*` variables that are set
    pub fn env_overrides(mut self) -> Self {
        let overrides: [(&str, &mut String); 5] = [
            ("GRAPHFRAG_TAG_NAME", &mut self.config.tag_name),
            ("GRAPHFRAG_VARIABLE", &mut self.config.variable),
            ("GRAPHFRAG_START_VARIABLE", &mut self.config.start_variable),
            ("GRAPHFRAG_END_VARIABLE", &mut self.config.end_variable),
            ("GRAPHFRAG_PARAM_PREFIX", &mut self.config.param_prefix),
        ];
        for (key, slot) in overrides {
            if let Ok(value) = env::var(key) {
                log::debug!("config override from {}", key);
                *slot = value;
            }
        }
        self
    }

    pub fn build(self) -> Result<CompilerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("identifier")
            .with_message("must start with a letter or underscore and contain only letters, digits or underscores".into()))
    }
}

fn validate_param_prefix(value: &str) -> Result<(), ValidationError> {
    if PARAM_PREFIX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("param_prefix")
            .with_message("may only contain letters, digits or underscores".into()))
    }
}

fn validate_distinct_endpoints(config: &CompilerConfig) -> Result<(), ValidationError> {
    if config.start_variable == config.end_variable {
        return Err(ValidationError::new("distinct_endpoints")
            .with_message("start and end variables must differ".into()));
    }
    Ok(())
}
