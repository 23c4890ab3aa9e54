use crate::application::dto::tags::TagPostsDto;
use crate::application::ports::store_error::StoreResult;
use crate::application::ports::tag_posts_query::TagPostsQuery;

pub struct ListTags<'a, Q: TagPostsQuery + ?Sized> {
    pub query: &'a Q,
}

impl<'a, Q: TagPostsQuery + ?Sized> ListTags<'a, Q> {
    pub async fn execute(&self) -> StoreResult<Vec<TagPostsDto>> {
        let rows = self.query.list_all().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
