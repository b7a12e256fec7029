use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

/// An object ready to be written, key already chosen by the caller
#[derive(Debug, Clone)]
pub struct ObjectUpload {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A stored object and the URL it is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload every object. Fails as a whole if any upload fails, and objects
    /// already written by the failed call are removed again.
    async fn upload_files(&self, files: Vec<ObjectUpload>) -> Result<Vec<StoredObject>, AppError>;

    async fn delete_files(&self, keys: &[String]) -> Result<(), AppError>;

    /// Object key behind a URL previously returned by `upload_files`
    fn extract_key_from_url(&self, url: &str) -> Option<String>;

    /// Key under the publicly readable prefix
    fn public_key(&self, path: &str) -> String;
}
