use crate::application::dto::DeletedDto;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::{StoreResult, parse_id};

pub struct DeletePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> DeletePost<'a, R> {
    pub async fn execute(&self, id: &str) -> StoreResult<DeletedDto> {
        let id = parse_id("post", id)?;
        let id = self.repo.delete(id).await?;
        Ok(DeletedDto { id })
    }
}
