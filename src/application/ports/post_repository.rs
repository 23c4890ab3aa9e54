use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::store_error::StoreResult;
use crate::domain::posts::post::{Post, PostDraft};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, draft: &PostDraft) -> StoreResult<Post>;

    /// Replaces title, content and the full set of tag links.
    async fn update(&self, id: Uuid, draft: &PostDraft) -> StoreResult<Post>;

    // empty `labels` => no filter; otherwise posts carrying any of them
    async fn list(&self, labels: &[String]) -> StoreResult<Vec<Post>>;

    async fn get(&self, id: Uuid) -> StoreResult<Post>;

    async fn delete(&self, id: Uuid) -> StoreResult<Uuid>;
}
