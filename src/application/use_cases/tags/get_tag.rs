use crate::application::dto::tags::TagPostsDto;
use crate::application::ports::store_error::{StoreResult, parse_id};
use crate::application::ports::tag_posts_query::TagPostsQuery;

pub struct GetTag<'a, Q: TagPostsQuery + ?Sized> {
    pub query: &'a Q,
}

impl<'a, Q: TagPostsQuery + ?Sized> GetTag<'a, Q> {
    pub async fn execute(&self, id: &str) -> StoreResult<TagPostsDto> {
        let id = parse_id("tag", id)?;
        let row = self.query.get(id).await?;
        Ok(row.into())
    }
}
