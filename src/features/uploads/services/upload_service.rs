use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::features::uploads::dtos::{DeletePhotosResponseDto, UploadPhotosResponseDto};
use crate::features::uploads::multipart::PhotoFile;
use crate::features::uploads::validation::{photo_extension, validate_photo_batch};
use crate::modules::storage::{ObjectStorage, ObjectUpload, StoredObject};
use crate::shared::constants::REPORT_PHOTO_PREFIX;
use crate::shared::validation::OBJECT_KEY_REGEX;

/// Service for report photo storage
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Validate a batch and upload the accepted photos
    pub async fn upload_photos(
        &self,
        principal: Option<&Principal>,
        files: Vec<PhotoFile>,
    ) -> Result<UploadPhotosResponseDto> {
        let user = require(principal, Capability::Authenticated)?;

        let batch = validate_photo_batch(files, 0)?;
        let stored = self.store_photos(user, batch.accepted).await?;

        Ok(UploadPhotosResponseDto {
            files: stored,
            warnings: batch.warnings,
        })
    }

    /// Upload already validated photos under the owner's prefix
    pub async fn store_photos(
        &self,
        owner: &Principal,
        photos: Vec<PhotoFile>,
    ) -> Result<Vec<StoredObject>> {
        if photos.is_empty() {
            return Ok(Vec::new());
        }

        let uploads: Vec<ObjectUpload> = photos
            .into_iter()
            .map(|photo| ObjectUpload {
                key: self.storage.public_key(&format!(
                    "{}/{}/{}.{}",
                    REPORT_PHOTO_PREFIX,
                    owner.id,
                    Uuid::new_v4(),
                    photo_extension(&photo.content_type)
                )),
                data: photo.data,
                content_type: photo.content_type,
            })
            .collect();

        let count = uploads.len();
        let stored = self.storage.upload_files(uploads).await?;
        info!("Uploaded {} photo(s) for user {}", count, owner.id);

        Ok(stored)
    }

    /// Delete photos by URL. Only the owner or an admin may delete a photo.
    pub async fn delete_photos(
        &self,
        principal: Option<&Principal>,
        urls: Vec<String>,
    ) -> Result<DeletePhotosResponseDto> {
        let user = require(principal, Capability::Authenticated)?;

        let mut keys = Vec::with_capacity(urls.len());
        let mut unknown = Vec::new();
        for url in &urls {
            match self.storage.extract_key_from_url(url) {
                Some(key) if OBJECT_KEY_REGEX.is_match(&key) && !key.contains("..") => {
                    keys.push(key)
                }
                _ => unknown.push(format!("Unknown photo URL: {}", url)),
            }
        }
        if !unknown.is_empty() {
            return Err(AppError::InvalidFields(unknown));
        }

        if !user.is_admin() {
            let own_prefix = self.owner_prefix(&user.id);
            if keys.iter().any(|key| !key.starts_with(&own_prefix)) {
                return Err(AppError::Forbidden(
                    "You do not have permission to delete this photo".to_string(),
                ));
            }
        }

        self.storage.delete_files(&keys).await?;
        info!("Deleted {} photo(s) on behalf of {}", keys.len(), user.id);

        Ok(DeletePhotosResponseDto {
            deleted: keys.len(),
        })
    }

    /// Best-effort removal of objects that ended up unreferenced
    pub async fn discard(&self, stored: &[StoredObject]) {
        if stored.is_empty() {
            return;
        }

        let keys: Vec<String> = stored.iter().map(|o| o.key.clone()).collect();
        if let Err(e) = self.storage.delete_files(&keys).await {
            warn!("Failed to remove orphaned photos {:?}: {}", keys, e);
        }
    }

    fn owner_prefix(&self, user_id: &str) -> String {
        self.storage
            .public_key(&format!("{}/{}/", REPORT_PHOTO_PREFIX, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        admin_principal, citizen_principal, photo, InMemoryObjectStorage,
    };

    fn service(storage: &Arc<InMemoryObjectStorage>) -> UploadService {
        UploadService::new(storage.clone())
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let storage = InMemoryObjectStorage::new();
        let err = service(&storage)
            .upload_photos(None, vec![photo("a.png", "image/png", 10)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_six_photos_upload_nothing() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();
        let files = (0..6).map(|i| photo(&format!("{}.png", i), "image/png", 10)).collect();

        let err = service(&storage)
            .upload_photos(Some(&citizen), files)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
        assert_eq!(storage.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_one_bad_file_out_of_five() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();
        let mut files: Vec<PhotoFile> = (0..4)
            .map(|i| photo(&format!("{}.jpg", i), "image/jpeg", 10))
            .collect();
        files.push(photo("clip.gif", "image/gif", 10));

        let result = service(&storage)
            .upload_photos(Some(&citizen), files)
            .await
            .unwrap();
        assert_eq!(result.files.len(), 4);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(storage.object_count(), 4);

        let prefix = format!("public/reports/{}/", citizen.id);
        assert!(result.files.iter().all(|f| f.key.starts_with(&prefix)));
        assert!(result.files.iter().all(|f| f.key.ends_with(".jpg")));
    }

    #[tokio::test]
    async fn test_delete_own_photo() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();
        let service = service(&storage);

        let uploaded = service
            .upload_photos(Some(&citizen), vec![photo("a.png", "image/png", 10)])
            .await
            .unwrap();
        let url = uploaded.files[0].url.clone();

        let result = service.delete_photos(Some(&citizen), vec![url]).await.unwrap();
        assert_eq!(result.deleted, 1);
        assert_eq!(storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_someone_elses_photo() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();
        let admin = admin_principal();
        let service = service(&storage);

        let uploaded = service
            .upload_photos(Some(&admin), vec![photo("a.png", "image/png", 10)])
            .await
            .unwrap();
        let url = uploaded.files[0].url.clone();

        let err = service
            .delete_photos(Some(&citizen), vec![url.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(storage.object_count(), 1);

        let uploaded = service
            .upload_photos(Some(&citizen), vec![photo("b.png", "image/png", 10)])
            .await
            .unwrap();
        let result = service
            .delete_photos(Some(&admin), vec![uploaded.files[0].url.clone(), url])
            .await
            .unwrap();
        assert_eq!(result.deleted, 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_url() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();

        let err = service(&storage)
            .delete_photos(
                Some(&citizen),
                vec!["https://elsewhere.org/photo.png".to_string()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(ref m) if m.len() == 1));
    }

    #[tokio::test]
    async fn test_path_traversal_is_not_a_known_url() {
        let storage = InMemoryObjectStorage::new();
        let citizen = citizen_principal();
        let url = storage.url_for(&format!(
            "public/reports/{}/../../other/a.png",
            citizen.id
        ));

        let err = service(&storage)
            .delete_photos(Some(&citizen), vec![url])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_external_error() {
        let storage = InMemoryObjectStorage::failing();
        let citizen = citizen_principal();

        let err = service(&storage)
            .upload_photos(Some(&citizen), vec![photo("a.png", "image/png", 10)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
