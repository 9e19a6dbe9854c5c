use crate::domain::model::ResourceAttributes;
use crate::utils::error::{Result, ShapeError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(ShapeError::UnsupportedFormatError {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Toml => "toml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_document(bytes: &[u8], format: DocumentFormat) -> Result<ResourceAttributes> {
    let content = String::from_utf8(bytes.to_vec())?;

    let attributes = match format {
        DocumentFormat::Json => serde_json::from_str(&content)?,
        DocumentFormat::Toml => toml::from_str(&content)?,
    };

    Ok(attributes)
}
