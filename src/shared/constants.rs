// =============================================================================
// ADMIN DASHBOARD
// =============================================================================

/// Fixed page size of the admin report dashboard
pub const ADMIN_REPORTS_PAGE_SIZE: i64 = 6;

// =============================================================================
// REPORT FORM
// =============================================================================

pub const MIN_TITLE_LENGTH: usize = 10;
pub const MIN_DESCRIPTION_LENGTH: usize = 20;

/// Maximum number of photos attached to a single report
pub const MAX_REPORT_PHOTOS: usize = 5;

/// Maximum size of one photo (5 MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Accepted photo MIME types. `image/jpg` is not registered but browsers send it.
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Object key prefix for report photos, followed by the owner id
pub const REPORT_PHOTO_PREFIX: &str = "reports";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Role value stored in `users.role` for administrators
pub const ROLE_ADMIN: &str = "ADMIN";
