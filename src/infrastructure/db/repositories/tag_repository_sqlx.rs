use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::store_error::{StoreError, StoreResult};
use crate::application::ports::tag_repository::TagRepository;
use crate::domain::tags::tag::Tag;
use crate::infrastructure::db::{PgPool, abort, begin};

pub struct SqlxTagRepository {
    pub pool: PgPool,
    pub statement_timeout: Option<Duration>,
}

impl SqlxTagRepository {
    pub fn new(pool: PgPool, statement_timeout: Option<Duration>) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, label: &str) -> StoreResult<Tag> {
        const OP: &str = "tag.create";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence(OP))?;
        let row = sqlx::query("INSERT INTO tags (id, label) VALUES ($1, $2) RETURNING id, label")
            .bind(Uuid::new_v4())
            .bind(label)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::persistence(OP))?;
        let tag = Tag {
            id: row.try_get("id").map_err(StoreError::persistence(OP))?,
            label: row.try_get("label").map_err(StoreError::persistence(OP))?,
        };
        tx.commit().await.map_err(StoreError::persistence(OP))?;
        tracing::info!(tag_id = %tag.id, "tag_created");
        Ok(tag)
    }

    async fn update(&self, id: Uuid, label: &str) -> StoreResult<Tag> {
        const OP: &str = "tag.update";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let row = sqlx::query("UPDATE tags SET label = $2 WHERE id = $1 RETURNING id, label")
            .bind(id)
            .bind(label)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let Some(row) = row else {
            abort(tx, OP, Some(id)).await?;
            return Err(StoreError::not_found("tag", OP, id));
        };
        let tag = Tag {
            id: row.try_get("id").map_err(StoreError::persistence_for(OP, id))?,
            label: row.try_get("label").map_err(StoreError::persistence_for(OP, id))?,
        };
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        tracing::info!(tag_id = %tag.id, "tag_updated");
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Uuid> {
        const OP: &str = "tag.delete";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        // links first: no association row may outlive its tag
        let unlinked = sqlx::query("DELETE FROM post_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
            .rows_affected();
        let deleted = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
            .rows_affected();
        if deleted == 0 {
            abort(tx, OP, Some(id)).await?;
            return Err(StoreError::not_found("tag", OP, id));
        }
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        tracing::info!(tag_id = %id, unlinked, "tag_deleted");
        Ok(id)
    }
}
