//! Resource attribute shape for one application environment.
//!
//! Four categories (analytics, api, auth, storage) map deployment-specific
//! instance names to records of string attributes. Every record rejects
//! undeclared attributes, and a Rust literal missing an attribute does not
//! compile:
//!
//! ```compile_fail
//! use amplify_resources::StorageAttributes;
//!
//! let storage = StorageAttributes {
//!     region: "ap-southeast-2".to_string(),
//! };
//! ```

use crate::domain::ports::AttributeSet;
use crate::utils::error::{Result, ShapeError};
use crate::utils::validation::{self, Validate};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Leaf marker used by the scaffolding tool's declaration output.
pub const SHAPE_MARKER: &str = "string";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Analytics,
    Api,
    Auth,
    Storage,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Analytics,
        Category::Api,
        Category::Auth,
        Category::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Analytics => "analytics",
            Category::Api => "api",
            Category::Auth => "auth",
            Category::Storage => "storage",
        }
    }

    pub fn attribute_names(&self) -> &'static [&'static str] {
        match self {
            Category::Analytics => AnalyticsAttributes::ATTRIBUTES,
            Category::Api => ApiAttributes::ATTRIBUTES,
            Category::Auth => AuthAttributes::ATTRIBUTES,
            Category::Storage => StorageAttributes::ATTRIBUTES,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ShapeError::InvalidConfigValueError {
                field: "category".to_string(),
                value: s.to_string(),
                reason: "Expected one of: analytics, api, auth, storage".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsAttributes {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "appName")]
    pub app_name: String,
}

impl AttributeSet for AnalyticsAttributes {
    const CATEGORY: Category = Category::Analytics;
    const ATTRIBUTES: &'static [&'static str] = &["Id", "Region", "appName"];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "Id" => Some(&self.id),
            "Region" => Some(&self.region),
            "appName" => Some(&self.app_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiAttributes {
    #[serde(rename = "GraphQLAPIEndpointOutput")]
    pub graphql_api_endpoint_output: String,
    #[serde(rename = "GraphQLAPIIdOutput")]
    pub graphql_api_id_output: String,
    #[serde(rename = "GraphQLAPIKeyOutput")]
    pub graphql_api_key_output: String,
}

impl AttributeSet for ApiAttributes {
    const CATEGORY: Category = Category::Api;
    const ATTRIBUTES: &'static [&'static str] = &[
        "GraphQLAPIEndpointOutput",
        "GraphQLAPIIdOutput",
        "GraphQLAPIKeyOutput",
    ];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "GraphQLAPIEndpointOutput" => Some(&self.graphql_api_endpoint_output),
            "GraphQLAPIIdOutput" => Some(&self.graphql_api_id_output),
            "GraphQLAPIKeyOutput" => Some(&self.graphql_api_key_output),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthAttributes {
    #[serde(rename = "AppClientID")]
    pub app_client_id: String,
    #[serde(rename = "AppClientIDWeb")]
    pub app_client_id_web: String,
    #[serde(rename = "HostedUIDomain")]
    pub hosted_ui_domain: String,
    #[serde(rename = "IdentityPoolId")]
    pub identity_pool_id: String,
    #[serde(rename = "IdentityPoolName")]
    pub identity_pool_name: String,
    /// JSON-encoded OAuth settings of the hosted UI.
    #[serde(rename = "OAuthMetadata")]
    pub oauth_metadata: String,
    #[serde(rename = "UserPoolArn")]
    pub user_pool_arn: String,
    #[serde(rename = "UserPoolId")]
    pub user_pool_id: String,
    #[serde(rename = "UserPoolName")]
    pub user_pool_name: String,
}

impl AttributeSet for AuthAttributes {
    const CATEGORY: Category = Category::Auth;
    const ATTRIBUTES: &'static [&'static str] = &[
        "AppClientID",
        "AppClientIDWeb",
        "HostedUIDomain",
        "IdentityPoolId",
        "IdentityPoolName",
        "OAuthMetadata",
        "UserPoolArn",
        "UserPoolId",
        "UserPoolName",
    ];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "AppClientID" => Some(&self.app_client_id),
            "AppClientIDWeb" => Some(&self.app_client_id_web),
            "HostedUIDomain" => Some(&self.hosted_ui_domain),
            "IdentityPoolId" => Some(&self.identity_pool_id),
            "IdentityPoolName" => Some(&self.identity_pool_name),
            "OAuthMetadata" => Some(&self.oauth_metadata),
            "UserPoolArn" => Some(&self.user_pool_arn),
            "UserPoolId" => Some(&self.user_pool_id),
            "UserPoolName" => Some(&self.user_pool_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageAttributes {
    #[serde(rename = "BucketName")]
    pub bucket_name: String,
    #[serde(rename = "Region")]
    pub region: String,
}

impl AttributeSet for StorageAttributes {
    const CATEGORY: Category = Category::Storage;
    const ATTRIBUTES: &'static [&'static str] = &["BucketName", "Region"];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "BucketName" => Some(&self.bucket_name),
            "Region" => Some(&self.region),
            _ => None,
        }
    }
}

/// Resource attributes of every backend category, keyed by instance name.
///
/// ```
/// use amplify_resources::ResourceAttributes;
///
/// let document = r#"{
///   "analytics": { "tutorbot": { "Id": "x", "Region": "y", "appName": "z" } },
///   "api": { "tutorbot": {
///     "GraphQLAPIEndpointOutput": "e", "GraphQLAPIIdOutput": "i", "GraphQLAPIKeyOutput": "k"
///   } },
///   "auth": { "tutorbotd4592c79": {
///     "AppClientID": "a", "AppClientIDWeb": "b", "HostedUIDomain": "c",
///     "IdentityPoolId": "d", "IdentityPoolName": "e", "OAuthMetadata": "{}",
///     "UserPoolArn": "f", "UserPoolId": "g", "UserPoolName": "h"
///   } },
///   "storage": { "tutorbot": { "BucketName": "b", "Region": "r" } }
/// }"#;
///
/// let attributes: ResourceAttributes = serde_json::from_str(document).unwrap();
/// assert_eq!(attributes.storage["tutorbot"].bucket_name, "b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceAttributes {
    #[serde(deserialize_with = "unique_instances")]
    pub analytics: BTreeMap<String, AnalyticsAttributes>,
    #[serde(deserialize_with = "unique_instances")]
    pub api: BTreeMap<String, ApiAttributes>,
    #[serde(deserialize_with = "unique_instances")]
    pub auth: BTreeMap<String, AuthAttributes>,
    #[serde(deserialize_with = "unique_instances")]
    pub storage: BTreeMap<String, StorageAttributes>,
}

/// Instance map with at least one entry and no repeated instance name.
fn unique_instances<'de, D, T>(deserializer: D) -> std::result::Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct InstancesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for InstancesVisitor<T> {
        type Value = BTreeMap<String, T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of instance names to attribute records")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut instances = BTreeMap::new();

            while let Some((name, attributes)) = map.next_entry::<String, T>()? {
                if instances.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate instance `{}`", name)));
                }
                instances.insert(name, attributes);
            }

            if instances.is_empty() {
                return Err(de::Error::custom("expected at least one instance"));
            }

            Ok(instances)
        }
    }

    deserializer.deserialize_map(InstancesVisitor(PhantomData))
}

fn category_leaves<T: AttributeSet>(
    instances: &BTreeMap<String, T>,
) -> impl Iterator<Item = (String, &str)> + '_ {
    instances.iter().flat_map(|(instance, attributes)| {
        T::ATTRIBUTES.iter().filter_map(move |name| {
            attributes
                .get(name)
                .map(|value| (format!("{}.{}.{}", T::CATEGORY, instance, name), value))
        })
    })
}

impl ResourceAttributes {
    /// The declared shape for `names`, every leaf set to [`SHAPE_MARKER`].
    pub fn shape(names: &InstanceNames) -> serde_json::Value {
        let mut root = serde_json::Map::new();

        for category in Category::ALL {
            let instances = names
                .for_category(category)
                .iter()
                .map(|instance| {
                    let attributes = category
                        .attribute_names()
                        .iter()
                        .map(|name| {
                            (
                                name.to_string(),
                                serde_json::Value::String(SHAPE_MARKER.to_string()),
                            )
                        })
                        .collect();
                    (instance.clone(), serde_json::Value::Object(attributes))
                })
                .collect();
            root.insert(
                category.as_str().to_string(),
                serde_json::Value::Object(instances),
            );
        }

        serde_json::Value::Object(root)
    }

    pub fn instances(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Analytics => self.analytics.keys().map(String::as_str).collect(),
            Category::Api => self.api.keys().map(String::as_str).collect(),
            Category::Auth => self.auth.keys().map(String::as_str).collect(),
            Category::Storage => self.storage.keys().map(String::as_str).collect(),
        }
    }

    pub fn attribute(&self, category: Category, instance: &str, name: &str) -> Option<&str> {
        match category {
            Category::Analytics => self.analytics.get(instance)?.get(name),
            Category::Api => self.api.get(instance)?.get(name),
            Category::Auth => self.auth.get(instance)?.get(name),
            Category::Storage => self.storage.get(instance)?.get(name),
        }
    }

    /// Number of leaf values across all categories.
    pub fn attribute_count(&self) -> usize {
        Category::ALL
            .into_iter()
            .map(|category| self.instances(category).len() * category.attribute_names().len())
            .sum()
    }

    /// Each category must hold exactly the instance names in `expected`.
    pub fn check_instances(&self, expected: &InstanceNames) -> Result<()> {
        for category in Category::ALL {
            let actual = self.instances(category);
            let wanted = expected.for_category(category);

            if let Some(missing) = wanted.iter().find(|name| !actual.contains(&name.as_str())) {
                return Err(ShapeError::MissingInstanceError {
                    category: category.to_string(),
                    instance: missing.clone(),
                });
            }

            if let Some(extra) = actual.iter().find(|name| !wanted.iter().any(|w| w.as_str() == **name)) {
                return Err(ShapeError::UnexpectedInstanceError {
                    category: category.to_string(),
                    instance: extra.to_string(),
                });
            }
        }

        Ok(())
    }

    fn leaves(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        category_leaves(&self.analytics)
            .chain(category_leaves(&self.api))
            .chain(category_leaves(&self.auth))
            .chain(category_leaves(&self.storage))
    }
}

impl Validate for ResourceAttributes {
    fn validate(&self) -> Result<()> {
        for (field, value) in self.leaves() {
            validation::validate_non_empty_string(&field, value)?;
        }

        for (instance, attributes) in &self.analytics {
            validation::validate_aws_region(
                &format!("analytics.{}.Region", instance),
                &attributes.region,
            )?;
        }

        for (instance, attributes) in &self.api {
            validation::validate_url(
                &format!("api.{}.GraphQLAPIEndpointOutput", instance),
                &attributes.graphql_api_endpoint_output,
            )?;
        }

        for (instance, attributes) in &self.auth {
            validation::validate_arn(
                &format!("auth.{}.UserPoolArn", instance),
                &attributes.user_pool_arn,
            )?;
            validation::validate_json_string(
                &format!("auth.{}.OAuthMetadata", instance),
                &attributes.oauth_metadata,
            )?;
        }

        for (instance, attributes) in &self.storage {
            validation::validate_s3_bucket_name(
                &format!("storage.{}.BucketName", instance),
                &attributes.bucket_name,
            )?;
            validation::validate_aws_region(
                &format!("storage.{}.Region", instance),
                &attributes.region,
            )?;
        }

        tracing::debug!("Value validation passed for {} attributes", self.attribute_count());
        Ok(())
    }
}

/// Expected instance names per category for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceNames {
    pub analytics: Vec<String>,
    pub api: Vec<String>,
    pub auth: Vec<String>,
    pub storage: Vec<String>,
}

impl InstanceNames {
    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::Analytics => &self.analytics,
            Category::Api => &self.api,
            Category::Auth => &self.auth,
            Category::Storage => &self.storage,
        }
    }

    /// Instance names as found in a document.
    pub fn from_attributes(attributes: &ResourceAttributes) -> Self {
        let names = |category: Category| -> Vec<String> {
            attributes
                .instances(category)
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        Self {
            analytics: names(Category::Analytics),
            api: names(Category::Api),
            auth: names(Category::Auth),
            storage: names(Category::Storage),
        }
    }
}

impl Validate for InstanceNames {
    fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let names = self.for_category(category);
            let field = format!("instances.{}", category);

            if names.is_empty() {
                return Err(ShapeError::ConfigValidationError {
                    field,
                    message: "At least one instance name is required".to_string(),
                });
            }

            for (i, name) in names.iter().enumerate() {
                validation::validate_resource_name(&field, name)?;
                if names[..i].contains(name) {
                    return Err(ShapeError::InvalidConfigValueError {
                        field,
                        value: name.clone(),
                        reason: "Duplicate instance name".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Outcome of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeReport {
    pub location: String,
    pub format: String,
    pub instances: BTreeMap<String, Vec<String>>,
    pub attributes_checked: usize,
    pub values_validated: bool,
}

impl fmt::Display for ShapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instances: Vec<String> = self
            .instances
            .iter()
            .map(|(category, names)| format!("{}=[{}]", category, names.join(",")))
            .collect();
        write!(
            f,
            "{} ({}): {} attributes, {}{}",
            self.location,
            self.format,
            self.attributes_checked,
            instances.join(" "),
            if self.values_validated {
                ", values validated"
            } else {
                ""
            }
        )
    }
}
