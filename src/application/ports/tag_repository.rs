use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::store_error::StoreResult;
use crate::domain::tags::tag::Tag;

/// Write side of the tag lifecycle. Every method runs in its own transaction
/// and leaves nothing open when it returns.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Mints a new id; callers never supply one.
    async fn create(&self, label: &str) -> StoreResult<Tag>;

    async fn update(&self, id: Uuid, label: &str) -> StoreResult<Tag>;

    /// Removes the tag's associations, then the tag. Returns the deleted id.
    async fn delete(&self, id: Uuid) -> StoreResult<Uuid>;
}
