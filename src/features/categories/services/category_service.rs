use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::NewCategory;
use crate::features::categories::repository::CategoryRepository;

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// List all categories (open to everyone, feeds the report form selector)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self
            .repository
            .list()
            .await
            .map_err(AppError::persistence("Failed to fetch report categories"))?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Create a category (admin only)
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        dto: CreateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        let admin = require(principal, Capability::Admin)?;

        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let new = NewCategory {
            name: dto.name.trim().to_string(),
            description: dto
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        };

        let category = self
            .repository
            .create(new)
            .await
            .map_err(AppError::persistence("Failed to add report category"))?;

        tracing::info!("Category {} created by {}", category.id, admin.id);

        Ok(category.into())
    }
}
