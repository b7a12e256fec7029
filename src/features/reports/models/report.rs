use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Type,
    ToSchema,
)]
#[sqlx(type_name = "report_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Submitted,
    InProgress,
    Resolved,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Submitted => write!(f, "SUBMITTED"),
            ReportStatus::InProgress => write!(f, "IN_PROGRESS"),
            ReportStatus::Resolved => write!(f, "RESOLVED"),
            ReportStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Report row joined with its category name
#[derive(Debug, Clone, FromRow)]
pub struct ReportRecord {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub description: String,
    pub address: String,
    /// Stored as `[lat, lng]`
    pub geo_location: Vec<f64>,
    pub date: Option<DateTime<Utc>>,
    pub contact: Option<String>,
    pub images: Vec<String>,
    pub status: ReportStatus,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: String,
    pub geo_location: [f64; 2],
    pub date: DateTime<Utc>,
    pub contact: Option<String>,
    pub images: Vec<String>,
    pub status: ReportStatus,
    pub user_id: String,
}
