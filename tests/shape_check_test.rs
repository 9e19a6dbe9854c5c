use amplify_resources::utils::error::ErrorCategory;
use amplify_resources::utils::validation::Validate;
use amplify_resources::{
    Category, EnvironmentConfig, LocalStorage, ResourceAttributes, ShapeChecker, ShapeError,
    SHAPE_MARKER,
};
use tempfile::TempDir;

const ENVIRONMENT: &str = include_str!("../environments/tutorbot.toml");

const DOCUMENT: &str = r#"{
  "analytics": {
    "tutorbot": {
      "Id": "6f1c0a52b1e24f5c9a1d3e8b7c6d5e4f",
      "Region": "ap-southeast-2",
      "appName": "tutorbot-dev"
    }
  },
  "api": {
    "tutorbot": {
      "GraphQLAPIEndpointOutput": "https://abc123.appsync-api.ap-southeast-2.amazonaws.com/graphql",
      "GraphQLAPIIdOutput": "abc123",
      "GraphQLAPIKeyOutput": "da2-xyz"
    }
  },
  "auth": {
    "tutorbotd4592c79": {
      "AppClientID": "client",
      "AppClientIDWeb": "client-web",
      "HostedUIDomain": "tutorbot-dev",
      "IdentityPoolId": "ap-southeast-2:1111-2222",
      "IdentityPoolName": "tutorbotd4592c79_identitypool_d4592c79__dev",
      "OAuthMetadata": "{\"AllowedOAuthFlows\":[\"code\"],\"CallbackURLs\":[\"http://localhost:3000/\"]}",
      "UserPoolArn": "arn:aws:cognito-idp:ap-southeast-2:123456789012:userpool/ap-southeast-2_abc",
      "UserPoolId": "ap-southeast-2_abc",
      "UserPoolName": "tutorbotd4592c79_userpool_d4592c79-dev"
    }
  },
  "storage": {
    "tutorbot": {
      "BucketName": "tutorbot-storage-dev",
      "Region": "ap-southeast-2"
    }
  }
}"#;

fn write_document(dir: &TempDir, name: &str, content: &str) -> LocalStorage {
    std::fs::write(dir.path().join(name), content).unwrap();
    LocalStorage::new(dir.path().to_str().unwrap().to_string())
}

fn environment() -> EnvironmentConfig {
    let config = EnvironmentConfig::from_toml_str(ENVIRONMENT).unwrap();
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_generated_environment_document_passes() {
    let dir = TempDir::new().unwrap();
    let storage = write_document(&dir, "backend.json", DOCUMENT);

    let checker = ShapeChecker::new(storage)
        .with_instances(environment().instances)
        .strict(true);
    let report = checker.check("backend.json").await.unwrap();

    assert_eq!(report.attributes_checked, 17);
    assert_eq!(report.instances["storage"], vec!["tutorbot".to_string()]);
    assert!(report.to_string().contains("auth=[tutorbotd4592c79]"));
}

#[tokio::test]
async fn test_document_missing_bucket_name_fails() {
    let dir = TempDir::new().unwrap();
    let document = DOCUMENT.replace(r#""BucketName": "tutorbot-storage-dev","#, "");
    let storage = write_document(&dir, "backend.json", &document);

    let err = ShapeChecker::new(storage)
        .check("backend.json")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Parse);
    assert!(err.to_string().contains("BucketName"));
}

#[tokio::test]
async fn test_document_with_extra_attribute_fails() {
    let dir = TempDir::new().unwrap();
    let document = DOCUMENT.replace(
        r#""Region": "ap-southeast-2"
    }
  }
}"#,
        r#""Region": "ap-southeast-2",
      "Prefix": "public/"
    }
  }
}"#,
    );
    assert_ne!(document, DOCUMENT);
    let storage = write_document(&dir, "backend.json", &document);

    let err = ShapeChecker::new(storage)
        .check("backend.json")
        .await
        .unwrap_err();
    assert!(matches!(err, ShapeError::JsonError(_)));
}

#[tokio::test]
async fn test_document_from_other_environment_fails_instance_check() {
    let dir = TempDir::new().unwrap();
    let document = DOCUMENT.replace("tutorbotd4592c79", "tutorbot0badf00d");
    let storage = write_document(&dir, "backend.json", &document);

    let checker = ShapeChecker::new(storage).with_instances(environment().instances);
    let err = checker.check("backend.json").await.unwrap_err();

    match err {
        ShapeError::MissingInstanceError { category, instance } => {
            assert_eq!(category, "auth");
            assert_eq!(instance, "tutorbotd4592c79");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_strict_mode_rejects_bad_values_that_shape_accepts() {
    let dir = TempDir::new().unwrap();
    let document = DOCUMENT.replace("tutorbot-storage-dev", "Tutorbot_Storage");
    let storage = write_document(&dir, "backend.json", &document);

    let lenient = ShapeChecker::new(storage.clone());
    assert!(lenient.check("backend.json").await.is_ok());

    let strict = ShapeChecker::new(storage).strict(true);
    let err = strict.check("backend.json").await.unwrap_err();
    assert!(err.to_string().contains("storage.tutorbot.BucketName"));
}

#[tokio::test]
async fn test_printed_shape_reparses_as_document() {
    let names = environment().instances;
    let shape = ResourceAttributes::shape(&names);

    // The marker document is itself a well-shaped document with placeholder values.
    let attributes: ResourceAttributes = serde_json::from_value(shape).unwrap();
    attributes.check_instances(&names).unwrap();

    for category in Category::ALL {
        for instance in attributes.instances(category) {
            for name in category.attribute_names() {
                assert_eq!(attributes.attribute(category, instance, name), Some(SHAPE_MARKER));
            }
        }
    }
}

#[tokio::test]
async fn test_shape_from_document_matches_environment_shape() {
    let dir = TempDir::new().unwrap();
    let storage = write_document(&dir, "backend.json", DOCUMENT);

    let checker = ShapeChecker::new(storage);
    let from_document = checker.describe_shape(Some("backend.json")).await.unwrap();

    assert_eq!(
        from_document,
        ResourceAttributes::shape(&environment().instances)
    );
}

#[tokio::test]
async fn test_document_with_empty_category_fails() {
    let dir = TempDir::new().unwrap();
    let start = DOCUMENT.find(r#""storage": {"#).unwrap();
    let document = format!("{}\"storage\": {{}}\n}}", &DOCUMENT[..start]);
    let storage = write_document(&dir, "backend.json", &document);

    let err = ShapeChecker::new(storage)
        .check("backend.json")
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("expected at least one instance"));
}
