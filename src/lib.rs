pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::EnvironmentConfig;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "s3")]
pub use config::s3::{S3Config, S3Storage};

pub use core::{checker::ShapeChecker, document::DocumentFormat};
pub use domain::model::{
    AnalyticsAttributes, ApiAttributes, AuthAttributes, Category, InstanceNames,
    ResourceAttributes, ShapeReport, StorageAttributes, SHAPE_MARKER,
};
pub use utils::error::{Result, ShapeError};
