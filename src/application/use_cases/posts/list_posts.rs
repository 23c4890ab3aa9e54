use crate::application::dto::posts::PostDto;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::StoreResult;
use crate::domain::posts::post::parse_tag_filter;

pub struct ListPosts<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> ListPosts<'a, R> {
    pub async fn execute(&self, tags: Option<&str>) -> StoreResult<Vec<PostDto>> {
        let labels = parse_tag_filter(tags);
        let rows = self.repo.list(&labels).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
