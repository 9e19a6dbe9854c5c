pub mod cli;
pub mod toml_config;

#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "cli")]
use crate::core::document::DocumentFormat;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, ShapeError};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "amplify-resources")]
#[command(about = "Check backend resource attribute documents against the declared shape")]
pub struct CliConfig {
    /// Resource attributes document to check (.json or .toml)
    #[arg(long)]
    pub document: Option<String>,

    /// Environment file listing the expected instance names
    #[arg(long)]
    pub environment: Option<String>,

    /// Directory that --document is resolved against
    #[arg(long, default_value = ".")]
    pub base_path: String,

    /// Also validate attribute values
    #[arg(long)]
    pub strict: bool,

    /// Print the declared shape as JSON instead of checking
    #[arg(long)]
    pub print_shape: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Read --document from this S3 bucket instead of --base-path
    #[cfg(feature = "s3")]
    #[arg(long)]
    pub s3_bucket: Option<String>,

    #[cfg(feature = "s3")]
    #[arg(long)]
    pub s3_region: Option<String>,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.document.is_none() && !self.print_shape {
            return Err(ShapeError::MissingConfigError {
                field: "document".to_string(),
            });
        }

        if self.print_shape && self.document.is_none() && self.environment.is_none() {
            return Err(ShapeError::ConfigValidationError {
                field: "print_shape".to_string(),
                message: "--print-shape needs --environment or --document to know the instance names"
                    .to_string(),
            });
        }

        if let Some(document) = &self.document {
            validation::validate_path("document", document)?;
            DocumentFormat::from_path(document)?;
        }

        if let Some(environment) = &self.environment {
            validation::validate_path("environment", environment)?;
            validation::validate_file_extensions(
                "environment",
                std::slice::from_ref(environment),
                &["toml"],
            )?;
        }

        validation::validate_path("base_path", &self.base_path)?;

        #[cfg(feature = "s3")]
        {
            if let Some(bucket) = &self.s3_bucket {
                validation::validate_s3_bucket_name("s3_bucket", bucket)?;
            }
            if let Some(region) = &self.s3_region {
                validation::validate_aws_region("s3_region", region)?;
            }
        }

        Ok(())
    }
}
