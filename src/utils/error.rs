use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Document is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported document format: '{extension}'")]
    UnsupportedFormatError { extension: String },

    #[error("Missing instance '{instance}' under '{category}'")]
    MissingInstanceError { category: String, instance: String },

    #[error("Undeclared instance '{instance}' under '{category}'")]
    UnexpectedInstanceError { category: String, instance: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    Configuration,
    Shape,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ShapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShapeError::IoError(_) => ErrorCategory::Io,
            ShapeError::Utf8Error(_) | ShapeError::JsonError(_) | ShapeError::TomlError(_) => {
                ErrorCategory::Parse
            }
            ShapeError::StorageError { .. } => ErrorCategory::Storage,
            ShapeError::ConfigValidationError { .. }
            | ShapeError::MissingConfigError { .. }
            | ShapeError::InvalidConfigValueError { .. }
            | ShapeError::UnsupportedFormatError { .. } => ErrorCategory::Configuration,
            ShapeError::MissingInstanceError { .. } | ShapeError::UnexpectedInstanceError { .. } => {
                ErrorCategory::Shape
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // A remote read may succeed on retry.
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Shape | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binary: 1 for bad input, 2 for retryable, 3 for system errors.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ShapeError::IoError(_) => "Check that the file exists and is readable",
            ShapeError::Utf8Error(_) => "Re-save the document with UTF-8 encoding",
            ShapeError::JsonError(_) | ShapeError::TomlError(_) => {
                "Compare the document against the output of --print-shape; every category, instance and attribute must be present and every value must be a string"
            }
            ShapeError::StorageError { .. } => {
                "Check the bucket name, region and AWS credentials, then retry"
            }
            ShapeError::ConfigValidationError { .. }
            | ShapeError::MissingConfigError { .. }
            | ShapeError::InvalidConfigValueError { .. } => {
                "Fix the highlighted configuration value and run again"
            }
            ShapeError::UnsupportedFormatError { .. } => "Use a .json or .toml document",
            ShapeError::MissingInstanceError { .. } | ShapeError::UnexpectedInstanceError { .. } => {
                "Make the document's instance names match the environment file, or regenerate the environment file for this deployment"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read input: {}", self),
            ErrorCategory::Parse => format!("Document does not match the resource shape: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Shape => format!("Instance names do not match the environment: {}", self),
            ErrorCategory::Storage => format!("Remote storage failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_errors_are_shape_errors() {
        let err = ShapeError::MissingInstanceError {
            category: "storage".to_string(),
            instance: "tutorbot".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Shape);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.to_string(), "Missing instance 'tutorbot' under 'storage'");
    }

    #[test]
    fn test_parse_errors_from_serde() {
        let err: ShapeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert!(err.user_friendly_message().starts_with("Document does not match"));
    }

    #[test]
    fn test_storage_errors_are_retryable() {
        let err = ShapeError::StorageError {
            message: "timeout".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            ShapeError::StorageError {
                message: "timeout".to_string(),
            },
            ShapeError::UnsupportedFormatError {
                extension: "ts".to_string(),
            },
            ShapeError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
        ];
        let codes: Vec<i32> = errors.iter().map(ShapeError::exit_code).collect();
        assert_eq!(codes, vec![2, 1, 3]);
    }
}
