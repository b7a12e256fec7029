mod comment;
mod report;

pub use comment::{Comment, CommentRecord, NewComment};
pub use report::{NewReport, ReportRecord, ReportStatus};
