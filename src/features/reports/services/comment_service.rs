use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::features::reports::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::reports::mapping::comment_from_author;
use crate::features::reports::models::NewComment;
use crate::features::reports::repository::CommentRepository;
use crate::shared::validation::error_messages;

/// Service for report comment threads
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    /// Append a comment to a report. The author is the caller.
    pub async fn add(
        &self,
        principal: Option<&Principal>,
        report_id: Uuid,
        dto: CreateCommentDto,
    ) -> Result<CommentResponseDto> {
        let user = require(principal, Capability::Authenticated)?;

        dto.validate()
            .map_err(|e| AppError::InvalidFields(error_messages(&e, &["content"])))?;

        let comment = self
            .comments
            .create(NewComment {
                report_id,
                user_id: user.id.clone(),
                content: dto.content.trim().to_string(),
            })
            .await
            .map_err(AppError::persistence("Failed to add comment to report"))?;

        tracing::debug!("Comment {} added to report {}", comment.id, report_id);

        Ok(comment_from_author(comment, user))
    }
}
