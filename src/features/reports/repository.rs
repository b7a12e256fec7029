use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{RepoResult, RepositoryError};
use crate::features::reports::models::{
    Comment, CommentRecord, NewComment, NewReport, ReportRecord, ReportStatus,
};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a report. A dangling `category_id` yields `MissingReference("Category")`.
    async fn create(&self, new: NewReport) -> RepoResult<ReportRecord>;
    /// Every report, newest first
    async fn list_all(&self) -> RepoResult<Vec<ReportRecord>>;
    async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<ReportRecord>>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReportRecord>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> RepoResult<Option<ReportRecord>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Append a comment. An unknown `report_id` yields `MissingReference("Report")`.
    async fn create(&self, new: NewComment) -> RepoResult<Comment>;
    /// Thread of a report in insertion order
    async fn list_for_report(&self, report_id: Uuid) -> RepoResult<Vec<CommentRecord>>;
}

const REPORT_COLUMNS: &str = r#"
    r.id, r.title, r.category_id, c.name AS category_name, r.description, r.address,
    r.geo_location, r.date, r.contact, r.images, r.status, r.user_id,
    r.created_at, r.updated_at
"#;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, new: NewReport) -> RepoResult<ReportRecord> {
        let sql = format!(
            r#"
            WITH r AS (
                INSERT INTO reports
                    (title, category_id, description, address, geo_location,
                     date, contact, images, status, user_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {REPORT_COLUMNS}
            FROM r
            JOIN categories c ON c.id = r.category_id
            "#
        );

        sqlx::query_as::<_, ReportRecord>(&sql)
            .bind(new.title)
            .bind(new.category_id)
            .bind(new.description)
            .bind(new.address)
            .bind(new.geo_location.to_vec())
            .bind(new.date)
            .bind(new.contact)
            .bind(new.images)
            .bind(new.status)
            .bind(new.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "Category"))
    }

    async fn list_all(&self) -> RepoResult<Vec<ReportRecord>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            ORDER BY r.created_at DESC
            "#
        );

        sqlx::query_as::<_, ReportRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<ReportRecord>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#
        );

        sqlx::query_as::<_, ReportRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReportRecord>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE r.id = $1
            "#
        );

        sqlx::query_as::<_, ReportRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> RepoResult<Option<ReportRecord>> {
        let sql = format!(
            r#"
            WITH r AS (
                UPDATE reports
                SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {REPORT_COLUMNS}
            FROM r
            JOIN categories c ON c.id = r.category_id
            "#
        );

        sqlx::query_as::<_, ReportRecord>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }
}

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new: NewComment) -> RepoResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (report_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, report_id, user_id, content, created_at
            "#,
        )
        .bind(new.report_id)
        .bind(new.user_id)
        .bind(new.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Report"))
    }

    async fn list_for_report(&self, report_id: Uuid) -> RepoResult<Vec<CommentRecord>> {
        sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT cm.id, cm.report_id, cm.user_id, u.name AS user_name,
                   u.image AS user_image, cm.content, cm.created_at
            FROM comments cm
            JOIN users u ON u.id = cm.user_id
            WHERE cm.report_id = $1
            ORDER BY cm.created_at, cm.id
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }
}
