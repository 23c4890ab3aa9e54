use crate::application::dto::DeletedDto;
use crate::application::ports::store_error::{StoreResult, parse_id};
use crate::application::ports::tag_repository::TagRepository;

pub struct DeleteTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> DeleteTag<'a, R> {
    pub async fn execute(&self, id: &str) -> StoreResult<DeletedDto> {
        let id = parse_id("tag", id)?;
        let id = self.repo.delete(id).await?;
        Ok(DeletedDto { id })
    }
}
