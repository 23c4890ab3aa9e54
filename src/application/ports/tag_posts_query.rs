use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::store_error::StoreResult;
use crate::domain::tags::tag::TagWithPosts;

#[async_trait]
pub trait TagPostsQuery: Send + Sync {
    /// One entry per tag, including tags without posts.
    async fn list_all(&self) -> StoreResult<Vec<TagWithPosts>>;

    async fn get(&self, id: Uuid) -> StoreResult<TagWithPosts>;
}
