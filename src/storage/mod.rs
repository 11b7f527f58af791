//! Object storage — S3 wrapper for logos and generated mockups

pub mod locator;

use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::ObjectCannedAcl;

use crate::error::BoxError;

/// Default expiry for presigned URLs
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(300);

/// S3-backed asset store
#[derive(Clone)]
pub struct ObjectStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStore {
    pub fn new(client: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public URL for a key in a public-read bucket
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Upload an object with public-read ACL, returning its public URL
    pub async fn put_public(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BoxError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.into())
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await?;
        Ok(self.public_url(key))
    }

    /// Download an object's bytes
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        let data = output.body.collect().await?;
        Ok(data.into_bytes().to_vec())
    }

    /// List object keys under a prefix
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, BoxError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await?;
        Ok(output
            .contents()
            .iter()
            .filter_map(|o| o.key().map(String::from))
            .collect())
    }

    /// Time-boxed presigned GET URL for private objects
    pub async fn presigned_get_url(&self, key: &str, expiry: Duration) -> Result<String, BoxError> {
        let presigning = PresigningConfig::expires_in(expiry)?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await?;
        Ok(presigned.uri().to_string())
    }

    /// Time-boxed presigned PUT URL for direct uploads
    pub async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expiry: Duration,
    ) -> Result<String, BoxError> {
        let presigning = PresigningConfig::expires_in(expiry)?;
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await?;
        Ok(presigned.uri().to_string())
    }
}
