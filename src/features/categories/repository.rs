use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{RepoResult, RepositoryError};
use crate::features::categories::models::{Category, NewCategory};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> RepoResult<Vec<Category>>;
    async fn create(&self, new: NewCategory) -> RepoResult<Category>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> RepoResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at
            FROM categories
            ORDER BY name, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn create(&self, new: NewCategory) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(new.name)
        .bind(new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }
}
