use crate::application::dto::tags::TagDto;
use crate::application::ports::store_error::StoreResult;
use crate::application::ports::tag_repository::TagRepository;

pub struct CreateTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> CreateTag<'a, R> {
    pub async fn execute(&self, label: &str) -> StoreResult<TagDto> {
        let tag = self.repo.create(label).await?;
        Ok(tag.into())
    }
}
