//! Fixtures shared by the unit and handler tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};
use chrono::Utc;
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, RepoResult, RepositoryError};
use crate::features::auth::model::{Principal, Role, UserRecord};
use crate::features::auth::repository::UserRepository;
use crate::features::auth::session::SessionClaims;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::categories::repository::CategoryRepository;
use crate::features::reports::dtos::{GeoLocationInput, ReportResponseDto, SubmitReportDto};
use crate::features::reports::models::{
    Comment, CommentRecord, NewComment, NewReport, ReportRecord, ReportStatus,
};
use crate::features::reports::repository::{CommentRepository, ReportRepository};
use crate::features::uploads::multipart::PhotoFile;
use crate::modules::storage::{ObjectStorage, ObjectUpload, StoredObject};
use crate::shared::constants::ROLE_ADMIN;

pub const ADMIN_ID: &str = "usr_admin_01";
pub const CITIZEN_ID: &str = "usr_citizen_01";

pub const ROAD_CATEGORY_ID: Uuid = Uuid::from_u128(0x0192_7c4e_5a10_7000_8000_0000_0000_0001);
pub const PARKS_CATEGORY_ID: Uuid = Uuid::from_u128(0x0192_7c4e_5a10_7000_8000_0000_0000_0002);

const SESSION_SECRET: &str = "test-session-secret-that-is-long-enough";
const STORAGE_BASE_URL: &str = "https://storage.test/photos";

pub fn admin_principal() -> Principal {
    Principal {
        id: ADMIN_ID.to_string(),
        name: "Claire Martin".to_string(),
        email: "claire.martin@city.test".to_string(),
        image: None,
        role: Some(Role::Admin),
    }
}

pub fn citizen_principal() -> Principal {
    Principal {
        id: CITIZEN_ID.to_string(),
        name: "Amina Diallo".to_string(),
        email: "amina.diallo@mail.test".to_string(),
        image: Some("https://avatars.test/amina.png".to_string()),
        role: None,
    }
}

fn user_record(principal: &Principal) -> UserRecord {
    UserRecord {
        id: principal.id.clone(),
        name: principal.name.clone(),
        email: principal.email.clone(),
        image: principal.image.clone(),
        role: principal.is_admin().then(|| ROLE_ADMIN.to_string()),
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        secret: SESSION_SECRET.to_string(),
        cookie_name: "session_token".to_string(),
        leeway: Duration::from_secs(60),
    }
}

/// Signed session token for `sub`, valid for an hour
pub fn session_token(sub: &str) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = SessionClaims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SESSION_SECRET.as_bytes()),
    )
    .expect("encode session token")
}

async fn inject_principal(
    State(principal): State<Option<Principal>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }
    next.run(req).await
}

/// Run `router` as if the session middleware had resolved `principal`
pub fn with_principal(router: Router, principal: Option<Principal>) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        principal,
        inject_principal,
    ))
}

pub fn photo(name: &str, content_type: &str, size: usize) -> PhotoFile {
    PhotoFile {
        file_name: name.to_string(),
        content_type: content_type.to_string(),
        data: vec![0u8; size],
    }
}

pub fn valid_submission(category_id: Uuid) -> SubmitReportDto {
    SubmitReportDto {
        title: "Pothole on Main Street".to_string(),
        category_id: Some(category_id),
        description: "A deep pothole has opened right next to the bus stop.".to_string(),
        address: "1 Main Street".to_string(),
        geo_location: GeoLocationInput {
            latitude: "48.8566".to_string(),
            longitude: "2.3522".to_string(),
        },
        date: None,
        contact: None,
        images: Vec::new(),
        status: None,
    }
}

pub fn sample_report_record(user_id: &str, location: [f64; 2]) -> ReportRecord {
    let now = Utc::now();
    ReportRecord {
        id: Uuid::new_v4(),
        title: "Overflowing bins behind the market".to_string(),
        category_id: ROAD_CATEGORY_ID,
        category_name: "Roads".to_string(),
        description: Sentence(6..10).fake(),
        address: "3 Market Square".to_string(),
        geo_location: location.to_vec(),
        date: Some(now),
        contact: Some(PhoneNumber().fake()),
        images: Vec::new(),
        status: ReportStatus::Submitted,
        user_id: user_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_report_dto() -> ReportResponseDto {
    sample_report_record(CITIZEN_ID, [48.8566, 2.3522])
        .try_into()
        .expect("valid sample report")
}

/// In-memory stand-in for every repository, with the same reference checks as Postgres
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<UserRecord>>,
    categories: Mutex<Vec<Category>>,
    reports: Mutex<Vec<ReportRecord>>,
    comments: Mutex<Vec<Comment>>,
    fail_next_write: AtomicBool,
}

impl InMemoryStore {
    /// Store holding the admin and citizen users plus the Roads and Parks categories
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        {
            let mut users = store.users.lock().unwrap();
            users.push(user_record(&admin_principal()));
            users.push(user_record(&citizen_principal()));

            let mut categories = store.categories.lock().unwrap();
            for (id, name) in [(ROAD_CATEGORY_ID, "Roads"), (PARKS_CATEGORY_ID, "Parks")] {
                categories.push(Category {
                    id,
                    name: name.to_string(),
                    description: None,
                    created_at: Utc::now(),
                });
            }
        }
        Arc::new(store)
    }

    /// Make the next write fail like a lost database connection
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn check_write(&self) -> RepoResult<()> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn category_name(&self, id: Uuid) -> Option<String> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    /// Insert a SUBMITTED report without going through the service
    pub fn insert_report(&self, owner: &str, category_id: Uuid) -> Uuid {
        let mut record = sample_report_record(owner, [48.8566, 2.3522]);
        record.category_id = category_id;
        record.category_name = self.category_name(category_id).expect("seeded category");
        let id = record.id;
        self.reports.lock().unwrap().push(record);
        id
    }

    pub fn set_status(&self, id: Uuid, status: ReportStatus) {
        if let Some(report) = self.reports.lock().unwrap().iter_mut().find(|r| r.id == id) {
            report.status = status;
        }
    }

    /// Report ids in insertion order
    pub fn report_ids(&self) -> Vec<Uuid> {
        self.reports.lock().unwrap().iter().map(|r| r.id).collect()
    }

    pub fn status_of(&self, id: Uuid) -> Option<ReportStatus> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> RepoResult<Vec<Category>> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(categories)
    }

    async fn create(&self, new: NewCategory) -> RepoResult<Category> {
        self.check_write()?;
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            created_at: Utc::now(),
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn create(&self, new: NewReport) -> RepoResult<ReportRecord> {
        self.check_write()?;
        let category_name = self
            .category_name(new.category_id)
            .ok_or(RepositoryError::MissingReference("Category"))?;

        let now = Utc::now();
        let record = ReportRecord {
            id: Uuid::new_v4(),
            title: new.title,
            category_id: new.category_id,
            category_name,
            description: new.description,
            address: new.address,
            geo_location: new.geo_location.to_vec(),
            date: Some(new.date),
            contact: new.contact,
            images: new.images,
            status: new.status,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        self.reports.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> RepoResult<Vec<ReportRecord>> {
        Ok(self.reports.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<ReportRecord>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReportRecord>> {
        Ok(self.reports.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> RepoResult<Option<ReportRecord>> {
        self.check_write()?;
        let mut reports = self.reports.lock().unwrap();
        Ok(reports.iter_mut().find(|r| r.id == id).map(|report| {
            report.status = status;
            report.updated_at = Utc::now();
            report.clone()
        }))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new: NewComment) -> RepoResult<Comment> {
        self.check_write()?;
        if !self.reports.lock().unwrap().iter().any(|r| r.id == new.report_id) {
            return Err(RepositoryError::MissingReference("Report"));
        }

        let mut comments = self.comments.lock().unwrap();
        // Keep creation times strictly increasing so ordering is stable
        let created_at = comments
            .last()
            .map(|c| c.created_at + chrono::Duration::milliseconds(1))
            .map_or_else(Utc::now, |next| next.max(Utc::now()));

        let comment = Comment {
            id: Uuid::new_v4(),
            report_id: new.report_id,
            user_id: new.user_id,
            content: new.content,
            created_at,
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_report(&self, report_id: Uuid) -> RepoResult<Vec<CommentRecord>> {
        let users = self.users.lock().unwrap();
        let mut thread: Vec<CommentRecord> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.report_id == report_id)
            .filter_map(|c| {
                let author = users.iter().find(|u| u.id == c.user_id)?;
                Some(CommentRecord {
                    id: c.id,
                    report_id: c.report_id,
                    user_id: c.user_id.clone(),
                    user_name: author.name.clone(),
                    user_image: author.image.clone(),
                    content: c.content.clone(),
                    created_at: c.created_at,
                })
            })
            .collect();
        thread.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(thread)
    }
}

/// Object storage keeping uploads in memory under `https://storage.test/photos/<key>`
#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    upload_calls: AtomicUsize,
    failing: bool,
}

impl InMemoryObjectStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Storage whose every call fails like an unreachable bucket
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Number of `upload_files` calls, successful or not
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", STORAGE_BASE_URL, key)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload_files(&self, files: Vec<ObjectUpload>) -> Result<Vec<StoredObject>, AppError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(AppError::ExternalServiceError(
                "Failed to upload photos".to_string(),
            ));
        }

        let mut objects = self.objects.lock().unwrap();
        Ok(files
            .into_iter()
            .map(|file| {
                let stored = StoredObject {
                    url: self.url_for(&file.key),
                    key: file.key.clone(),
                };
                objects.insert(file.key, file.data);
                stored
            })
            .collect())
    }

    async fn delete_files(&self, keys: &[String]) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::ExternalServiceError(
                "Failed to delete photos".to_string(),
            ));
        }

        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    fn extract_key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", STORAGE_BASE_URL))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    fn public_key(&self, path: &str) -> String {
        format!("public/{}", path.trim_start_matches('/'))
    }
}
