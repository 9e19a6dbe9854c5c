use crate::domain::model::InstanceNames;
use crate::utils::error::{Result, ShapeError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Environment file: which instance names one deployment exposes.
///
/// ```toml
/// [environment]
/// name = "dev"
///
/// [instances]
/// analytics = ["tutorbot"]
/// api = ["tutorbot"]
/// auth = ["${AUTH_RESOURCE_NAME}"]
/// storage = ["tutorbot"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub environment: Option<EnvironmentInfo>,
    pub instances: InstanceNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentInfo {
    pub name: String,
    pub description: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl EnvironmentConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ShapeError::ConfigValidationError {
            field: "environment_file".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay verbatim.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn name(&self) -> Option<&str> {
        self.environment.as_ref().map(|env| env.name.as_str())
    }
}

impl Validate for EnvironmentConfig {
    fn validate(&self) -> Result<()> {
        if let Some(env) = &self.environment {
            validation::validate_non_empty_string("environment.name", &env.name)?;
        }
        self.instances.validate()
    }
}
