use crate::application::dto::posts::PostDto;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::{StoreResult, parse_id};
use crate::domain::posts::post::PostDraft;

pub struct UpdatePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> UpdatePost<'a, R> {
    pub async fn execute(&self, id: &str, draft: PostDraft) -> StoreResult<PostDto> {
        let id = parse_id("post", id)?;
        let post = self.repo.update(id, &draft).await?;
        Ok(post.into())
    }
}
