//! Object storage for uploaded images.
//!
//! Forum images and profile photos are pushed to a bucket (or a local
//! directory during development) and referenced by their public URL.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StorageSettings;
use crate::{AppError, AppResult};

/// Stored object metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Object key.
    pub key: String,
    /// Public URL to access the object.
    pub url: String,
    /// MIME content type.
    pub content_type: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedFile>;

    /// Public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Shared storage handle.
pub type SharedStorage = Arc<dyn StorageBackend>;

/// Build the backend selected in configuration.
pub async fn build_storage(settings: &StorageSettings) -> AppResult<SharedStorage> {
    match settings {
        StorageSettings::Local {
            base_path,
            base_url,
        } => Ok(Arc::new(LocalStorage::new(base_path.clone(), base_url.clone()))),
        #[cfg(feature = "s3")]
        StorageSettings::S3 {
            endpoint,
            bucket,
            region,
            access_key_id,
            secret_access_key,
            public_url,
        } => Ok(Arc::new(
            S3Storage::new(
                endpoint,
                bucket.clone(),
                region,
                access_key_id,
                secret_access_key,
                public_url.clone(),
            )
            .await?,
        )),
        #[cfg(not(feature = "s3"))]
        StorageSettings::S3 { .. } => Err(AppError::Config(
            "S3 storage requires the `s3` feature".to_string(),
        )),
    }
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(key = %key, size = data.len(), "Stored object on local disk");

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            content_type: content_type.to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// S3-compatible object storage backend.
#[cfg(feature = "s3")]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: Option<String>,
}

#[cfg(feature = "s3")]
impl S3Storage {
    /// Create a new S3 storage backend.
    pub async fn new(
        endpoint: &str,
        bucket: String,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        public_url: Option<String>,
    ) -> AppResult<Self> {
        use aws_config::Region;
        use aws_sdk_s3::config::Credentials;

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "traversee");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(endpoint)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket,
            public_url,
        })
    }
}

#[cfg(feature = "s3")]
#[async_trait::async_trait]
impl StorageBackend for S3Storage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        use aws_sdk_s3::primitives::ByteStream;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        tracing::debug!(bucket = %self.bucket, key = %key, "Stored object in bucket");

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            content_type: content_type.to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("https://storage.googleapis.com/{}/{}", self.bucket, key),
        }
    }
}

/// Subtype of an `image/*` content type, or `None` for anything else.
#[must_use]
pub fn image_subtype(content_type: &str) -> Option<&str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence
        .strip_prefix("image/")
        .filter(|subtype| !subtype.is_empty())
}

/// An image received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Image subtype, rejecting anything that is not `image/*`.
    pub fn subtype(&self) -> AppResult<&str> {
        image_subtype(&self.content_type)
            .ok_or_else(|| AppError::BadRequest("File is not a valid image".to_string()))
    }
}

/// Key for a forum image: `forums/{timestamp}_{uuid}.{subtype}`.
#[must_use]
pub fn forum_image_key(subtype: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    format!("forums/{timestamp}_{}.{subtype}", uuid::Uuid::new_v4().simple())
}

/// Key for a profile photo. One object per user, overwritten on change.
#[must_use]
pub fn profile_photo_key(user_id: &str, subtype: &str) -> String {
    format!("profiles/photo-{user_id}.{subtype}")
}
