use crate::core::Storage;
use crate::utils::error::{Result, ShapeError};
use crate::utils::validation::{self, Validate};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
}

impl S3Config {
    /// Bucket from the command line, region from the flag, then `AWS_REGION`.
    pub fn new(bucket: String, region: Option<String>) -> Self {
        let region = region
            .or_else(|| std::env::var("AWS_REGION").ok())
            .unwrap_or_else(|| "us-east-1".to_string());
        Self { bucket, region }
    }

    pub async fn storage(&self) -> S3Storage {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .region(Region::new(self.region.clone()))
            .build();
        S3Storage::new(S3Client::from_conf(config), self.bucket.clone())
    }
}

impl Validate for S3Config {
    fn validate(&self) -> Result<()> {
        validation::validate_s3_bucket_name("s3_bucket", &self.bucket)?;
        validation::validate_aws_region("s3_region", &self.region)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|err| {
                let message = match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => {
                        format!("s3://{}/{} does not exist", self.bucket, path)
                    }
                    other => format!(
                        "Failed to read s3://{}/{}: {}",
                        self.bucket,
                        path,
                        other.message().unwrap_or("unknown error")
                    ),
                };
                ShapeError::StorageError { message }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| ShapeError::StorageError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    fn describe(&self, path: &str) -> String {
        format!("s3://{}/{}", self.bucket, path)
    }
}
