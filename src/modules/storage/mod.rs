//! Storage module for report photos
//!
//! `ObjectStorage` is the seam services depend on; `MinIOClient` implements it
//! against MinIO or any S3-compatible service.

mod minio_client;
mod object_storage;

pub use minio_client::MinIOClient;
pub use object_storage::{ObjectStorage, ObjectUpload, StoredObject};
