use crate::application::dto::posts::PostDto;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::StoreResult;
use crate::domain::posts::post::PostDraft;

pub struct CreatePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> CreatePost<'a, R> {
    pub async fn execute(&self, draft: PostDraft) -> StoreResult<PostDto> {
        let post = self.repo.create(&draft).await?;
        Ok(post.into())
    }
}
