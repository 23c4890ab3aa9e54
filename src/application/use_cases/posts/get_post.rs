use crate::application::dto::posts::PostDto;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::{StoreResult, parse_id};

pub struct GetPost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> GetPost<'a, R> {
    pub async fn execute(&self, id: &str) -> StoreResult<PostDto> {
        let id = parse_id("post", id)?;
        Ok(self.repo.get(id).await?.into())
    }
}
