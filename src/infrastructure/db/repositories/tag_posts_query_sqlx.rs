use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::store_error::{StoreError, StoreResult};
use crate::application::ports::tag_posts_query::TagPostsQuery;
use crate::domain::tags::tag::{TagWithPosts, collect_present};
use crate::infrastructure::db::{PgPool, begin};

// The outer joins yield one NULL post row for a tag without links; the FILTER
// keeps it out of the aggregate and COALESCE turns "no rows" into '{}'.
const TAG_POSTS_SELECT: &str = r#"
    SELECT t.id, t.label,
           COALESCE(
               ARRAY_AGG(DISTINCT p.title ORDER BY p.title) FILTER (WHERE p.id IS NOT NULL),
               ARRAY[]::text[]
           ) AS posts
    FROM tags t
    LEFT JOIN post_tags pt ON pt.tag_id = t.id
    LEFT JOIN posts p ON p.id = pt.post_id"#;

pub struct SqlxTagPostsQuery {
    pub pool: PgPool,
    pub statement_timeout: Option<Duration>,
}

impl SqlxTagPostsQuery {
    pub fn new(pool: PgPool, statement_timeout: Option<Duration>) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

fn map_row(r: &PgRow) -> Result<TagWithPosts, sqlx::Error> {
    Ok(TagWithPosts {
        id: r.try_get("id")?,
        label: r.try_get("label")?,
        posts: collect_present(r.try_get::<Vec<Option<String>>, _>("posts")?),
    })
}

#[async_trait]
impl TagPostsQuery for SqlxTagPostsQuery {
    async fn list_all(&self) -> StoreResult<Vec<TagWithPosts>> {
        const OP: &str = "tag.list";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence(OP))?;
        let sql = format!("{TAG_POSTS_SELECT} GROUP BY t.id ORDER BY t.label, t.id");
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::persistence(OP))?;
        tx.commit().await.map_err(StoreError::persistence(OP))?;
        rows.iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::persistence(OP))
    }

    async fn get(&self, id: Uuid) -> StoreResult<TagWithPosts> {
        const OP: &str = "tag.get";
        let mut tx = begin(&self.pool, self.statement_timeout)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        let sql = format!("{TAG_POSTS_SELECT} WHERE t.id = $1 GROUP BY t.id");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::persistence_for(OP, id))?;
        tx.commit().await.map_err(StoreError::persistence_for(OP, id))?;
        match row {
            Some(r) => map_row(&r).map_err(StoreError::persistence_for(OP, id)),
            None => Err(StoreError::not_found("tag", OP, id)),
        }
    }
}
