use crate::core::document::{parse_document, DocumentFormat};
use crate::core::Storage;
use crate::domain::model::{Category, InstanceNames, ResourceAttributes, ShapeReport};
use crate::utils::error::{Result, ShapeError};
use crate::utils::validation::Validate;

struct LoadedDocument {
    attributes: ResourceAttributes,
    format: DocumentFormat,
    location: String,
}

/// Reads a resource attributes document and checks it against the declared shape.
pub struct ShapeChecker<S: Storage> {
    storage: S,
    instances: Option<InstanceNames>,
    strict: bool,
}

impl<S: Storage> ShapeChecker<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            instances: None,
            strict: false,
        }
    }

    /// Require the document's instance names to match `instances` exactly.
    pub fn with_instances(mut self, instances: InstanceNames) -> Self {
        self.instances = Some(instances);
        self
    }

    /// Also validate attribute values (regions, bucket names, endpoints).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    async fn read(&self, path: &str) -> Result<LoadedDocument> {
        let format = DocumentFormat::from_path(path)?;
        let location = self.storage.describe(path);

        tracing::debug!("Reading {} document from {}", format, location);
        let bytes = self.storage.read_file(path).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        Ok(LoadedDocument {
            attributes: parse_document(&bytes, format)?,
            format,
            location,
        })
    }

    pub async fn load(&self, path: &str) -> Result<ResourceAttributes> {
        Ok(self.read(path).await?.attributes)
    }

    /// Declared shape for the configured instance names, or for the names in `document`.
    pub async fn describe_shape(&self, document: Option<&str>) -> Result<serde_json::Value> {
        let names = match (&self.instances, document) {
            (Some(names), _) => names.clone(),
            (None, Some(path)) => InstanceNames::from_attributes(&self.load(path).await?),
            (None, None) => {
                return Err(ShapeError::MissingConfigError {
                    field: "environment".to_string(),
                })
            }
        };
        Ok(ResourceAttributes::shape(&names))
    }

    pub async fn check(&self, path: &str) -> Result<ShapeReport> {
        let LoadedDocument {
            attributes,
            format,
            location,
        } = self.read(path).await?;
        tracing::info!("Document matches the resource attribute shape");

        match &self.instances {
            Some(expected) => {
                attributes.check_instances(expected)?;
                tracing::info!("Instance names match the environment");
            }
            None => {
                tracing::warn!("No environment given, instance names were not checked");
            }
        }

        if self.strict {
            attributes.validate()?;
            tracing::info!("Attribute values passed validation");
        }

        let instances = Category::ALL
            .into_iter()
            .map(|category| {
                (
                    category.to_string(),
                    attributes
                        .instances(category)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                )
            })
            .collect();

        Ok(ShapeReport {
            location,
            format: format.to_string(),
            instances,
            attributes_checked: attributes.attribute_count(),
            values_validated: self.strict,
        })
    }
}
