pub mod dtos;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod validation;

pub use repository::{PgCommentRepository, PgReportRepository};
pub use services::{CommentService, ReportService};
