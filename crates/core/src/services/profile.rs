//! Profile picture service.

use traversee_common::{AppError, AppResult, ImageUpload, SharedStorage, profile_photo_key};

use super::identity::IdentityService;

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    identity: IdentityService,
    storage: SharedStorage,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(identity: IdentityService, storage: SharedStorage) -> Self {
        Self { identity, storage }
    }

    /// Store a new profile photo for `user_id` and publish it to the
    /// identity provider. Returns the photo URL.
    pub async fn update_photo(&self, user_id: &str, photo: Option<ImageUpload>) -> AppResult<String> {
        let photo =
            photo.ok_or_else(|| AppError::BadRequest("File is not a valid image".to_string()))?;
        let key = profile_photo_key(user_id, photo.subtype()?);

        let stored = self
            .storage
            .upload(&key, &photo.data, &photo.content_type)
            .await?;
        let user = self.identity.update_photo_url(user_id, &stored.url).await?;

        tracing::info!(user_id = %user_id, key = %key, "Updated profile photo");
        Ok(user.photo_url.unwrap_or(stored.url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::identity::{IdentityProvider, StaticIdentityProvider};
    use std::sync::Arc;
    use traversee_common::LocalStorage;

    fn storage(dir: &std::path::Path) -> SharedStorage {
        Arc::new(LocalStorage::new(
            dir.to_path_buf(),
            "http://localhost/files".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_update_photo() {
        let dir = std::env::temp_dir().join(format!("traversee-profile-{}", std::process::id()));
        let identity: IdentityService =
            Arc::new(StaticIdentityProvider::new().with_user("user1", "Sari", None));
        let service = ProfileService::new(Arc::clone(&identity), storage(&dir));

        let url = service
            .update_photo(
                "user1",
                Some(ImageUpload {
                    content_type: "image/png".to_string(),
                    data: vec![0x89, 0x50, 0x4e, 0x47],
                }),
            )
            .await
            .unwrap();

        assert_eq!(url, "http://localhost/files/profiles/photo-user1.png");
        let user = identity.get_user("user1").await.unwrap().unwrap();
        assert_eq!(user.photo_url.as_deref(), Some(url.as_str()));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let dir = std::env::temp_dir().join("traversee-profile-reject");
        let identity: IdentityService = Arc::new(StaticIdentityProvider::new());
        let service = ProfileService::new(identity, storage(&dir));

        let result = service
            .update_photo(
                "user1",
                Some(ImageUpload {
                    content_type: "text/plain".to_string(),
                    data: b"hello".to_vec(),
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
