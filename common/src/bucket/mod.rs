use crate::config::{Bucket, CONFIG};
use crate::error::GeneralError;
use crate::retry_async;
use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

pub fn init_s3() -> aws_sdk_s3::Client {
    build_s3(&CONFIG.bucket)
}

/// Sdk retries are disabled, callers go through [`retry_async`] instead.
pub fn build_s3(bucket: &Bucket) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        bucket.user.to_owned(),
        bucket.password.to_owned(),
        None,
        None,
        "static",
    );
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(bucket.url.to_owned())
        .region(Region::new(bucket.region.to_owned()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

pub static S3_CLIENT: LazyLock<aws_sdk_s3::Client> = LazyLock::new(init_s3);

/// External store of vehicle media bytes. Rows only ever hold the
/// `public_id` an asset is addressed by.
#[async_trait]
pub trait AssetStoreExt {
    async fn delete_asset(&self, public_id: &str) -> Result<(), GeneralError>;
}

/// Do not wrap `S3AssetStore` in an [`std::sync::Arc`], the sdk client is
/// already reference counted.
#[derive(Clone)]
pub struct S3AssetStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3AssetStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(S3_CLIENT.clone(), CONFIG.bucket.name.to_owned())
    }

    async fn delete_object(&self, public_id: &str) -> Result<(), GeneralError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| GeneralError::S3(e.to_string()))
    }
}

#[async_trait]
impl AssetStoreExt for S3AssetStore {
    #[instrument(skip(self))]
    async fn delete_asset(&self, public_id: &str) -> Result<(), GeneralError> {
        retry_async(Duration::from_millis(300), 3, || self.delete_object(public_id)).await?;
        debug!(bucket = %self.bucket, "asset deleted");
        Ok(())
    }
}
