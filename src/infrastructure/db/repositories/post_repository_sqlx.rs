use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::{StoreError, StoreResult};
use crate::domain::posts::post::{Post, PostDraft};
use crate::domain::tags::tag::collect_present;
use crate::infrastructure::db::{PgPool, abort, begin};

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.created_at, p.updated_at,
           COALESCE(
               ARRAY_AGG(DISTINCT t.label ORDER BY t.label) FILTER (WHERE t.id IS NOT NULL),
               ARRAY[]::text[]
           ) AS tags
    FROM posts p
    LEFT JOIN post_tags pt ON pt.post_id = p.id
    LEFT JOIN tags t ON t.id = pt.tag_id"#;

pub struct SqlxPostRepository {
    pub pool: PgPool,
    pub statement_timeout: Option<Duration>,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool, statement_timeout: Option<Duration>) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

fn map_row(r: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: r.try_get("id")?,
        title: r.try_get("title")?,
        content: r.try_get("content")?,
        tags: collect_present(r.try_get::<Vec<Option<String>>, _>("tags")?),
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

async fn fetch_post<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!("{POST_SELECT} WHERE p.id = $1 GROUP BY p.id");
    let row = sqlx::query(&sql).bind(id).fetch_optional(exec).await?;
    row.as_ref().map(map_row).transpose()
}

/// Returns the first requested tag id with no row. Matching rows are locked
/// against deletion until the transaction ends.
async fn first_missing_tag(
    tx: &mut Transaction<'static, Postgres>,
    tag_ids: &[Uuid],
) -> Result<Option<Uuid>, sqlx::Error> {
    if tag_ids.is_empty() {
        return Ok(None);
    }
    let found: HashSet<Uuid> =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM tags WHERE id = ANY($1) FOR KEY SHARE")
            .bind(tag_ids)
            .fetch_all(&mut **tx)
            .await?
            .into_iter()
            .collect();
    Ok(tag_ids.iter().find(|id| !found.contains(id)).copied())
}

async fn link_tags(
    tx: &mut Transaction<'static, Postgres>,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    sqlx::query("INSERT INTO post_tags (tag_id, post_id) SELECT UNNEST($1::uuid[]), $2")
        .bind(tag_ids)
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, draft: &PostDraft) -> StoreResult<Post> {
        const OP: &str = "post.create";
        let tag_ids = draft.distinct_tag_ids();
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence(OP))?;
        if let Some(missing) = first_missing_tag(&mut tx, &tag_ids)
            .await
            .map_err(StoreError::persistence(OP))?
        {
            abort(tx, OP, Some(missing)).await?;
            return Err(StoreError::not_found("tag", OP, missing));
        }
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO posts (id, title, content) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.content)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        link_tags(&mut tx, id, &tag_ids)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let post = fetch_post(&mut *tx, id)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
            .ok_or_else(|| StoreError::not_found("post", OP, id))?;
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        tracing::info!(post_id = %id, tags = tag_ids.len(), "post_created");
        Ok(post)
    }

    async fn update(&self, id: Uuid, draft: &PostDraft) -> StoreResult<Post> {
        const OP: &str = "post.update";
        let tag_ids = draft.distinct_tag_ids();
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let updated = sqlx::query(
            "UPDATE posts SET title = $2, content = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.content)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::persistence_for(OP, id))?
        .rows_affected();
        if updated == 0 {
            abort(tx, OP, Some(id)).await?;
            return Err(StoreError::not_found("post", OP, id));
        }
        if let Some(missing) = first_missing_tag(&mut tx, &tag_ids)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
        {
            abort(tx, OP, Some(id)).await?;
            return Err(StoreError::not_found("tag", OP, missing));
        }
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        link_tags(&mut tx, id, &tag_ids)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let post = fetch_post(&mut *tx, id)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
            .ok_or_else(|| StoreError::not_found("post", OP, id))?;
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        tracing::info!(post_id = %id, tags = tag_ids.len(), "post_updated");
        Ok(post)
    }

    async fn list(&self, labels: &[String]) -> StoreResult<Vec<Post>> {
        const OP: &str = "post.list";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence(OP))?;
        // an empty label list matches every post
        let sql = format!(
            r#"{POST_SELECT}
               WHERE cardinality($1::text[]) = 0 OR EXISTS (
                   SELECT 1 FROM post_tags fpt
                   JOIN tags ft ON ft.id = fpt.tag_id
                   WHERE fpt.post_id = p.id AND ft.label = ANY($1)
               )
               GROUP BY p.id
               ORDER BY p.created_at DESC, p.id"#
        );
        let rows = sqlx::query(&sql)
            .bind(labels)
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::persistence(OP))?;
        tx.commit().await.map_err(StoreError::persistence(OP))?;
        rows.iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::persistence(OP))
    }

    async fn get(&self, id: Uuid) -> StoreResult<Post> {
        const OP: &str = "post.get";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let post = fetch_post(&mut *tx, id)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        post.ok_or_else(|| StoreError::not_found("post", OP, id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Uuid> {
        const OP: &str = "post.delete";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?
            .rows_affected();
        if deleted == 0 {
            abort(tx, OP, Some(id)).await?;
            return Err(StoreError::not_found("post", OP, id));
        }
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        tracing::info!(post_id = %id, "post_deleted");
        Ok(id)
    }
}
