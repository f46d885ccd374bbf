use std::fmt;

use aws_credential_types::provider::ProvideCredentials;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::TinyPngError;

const S3_SERVICE: &str = "s3";

/// Settings for storing a compressed image directly in Amazon S3.
///
/// Serializes to the `store` object the API expects, with `bucket` and `path`
/// joined as `"<bucket>/<path>"`. Use `clone()` to derive per-call settings; the
/// copy is fully independent of the original.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Configuration {
    aws_access_key_id: String,
    aws_secret_access_key: String,
    /// The bucket to store into.
    pub bucket: String,
    /// The AWS region of the bucket, e.g. `"us-west-1"`.
    pub region: String,
    /// The object key inside the bucket.
    pub path: String,
}

impl S3Configuration {
    /// Creates a configuration with an empty path.
    pub fn new(
        aws_access_key_id: impl Into<String>,
        aws_secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            aws_access_key_id: aws_access_key_id.into(),
            aws_secret_access_key: aws_secret_access_key.into(),
            bucket: bucket.into(),
            region: region.into(),
            path: String::new(),
        }
    }

    /// Builds a configuration from the standard AWS credential and region chain
    /// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`, profile files).
    ///
    /// Session tokens are not supported by the store endpoint and are ignored.
    ///
    /// # Errors
    ///
    /// `TinyPngError::Credentials` if no credentials or no region can be resolved.
    pub async fn from_aws_env(bucket: impl Into<String>) -> Result<Self, TinyPngError> {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| TinyPngError::Credentials("no credentials provider configured".into()))?;
        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| TinyPngError::Credentials(e.to_string()))?;
        let region = sdk_config
            .region()
            .ok_or_else(|| TinyPngError::Credentials("no AWS region configured".into()))?;

        tracing::debug!(region = %region, "resolved S3 settings from the AWS environment");

        Ok(Self::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            bucket,
            region.to_string(),
        ))
    }

    pub fn aws_access_key_id(&self) -> &str {
        &self.aws_access_key_id
    }

    pub fn aws_secret_access_key(&self) -> &str {
        &self.aws_secret_access_key
    }

    /// The `"<bucket>/<path>"` string sent to the API.
    pub fn bucket_path(&self) -> String {
        format!("{}/{}", self.bucket, self.path)
    }
}

impl fmt::Debug for S3Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Configuration")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("path", &self.path)
            .finish()
    }
}

impl Serialize for S3Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("S3Configuration", 5)?;
        state.serialize_field("service", S3_SERVICE)?;
        state.serialize_field("aws_access_key_id", &self.aws_access_key_id)?;
        state.serialize_field("aws_secret_access_key", &self.aws_secret_access_key)?;
        state.serialize_field("region", &self.region)?;
        state.serialize_field("path", &self.bucket_path())?;
        state.end()
    }
}
