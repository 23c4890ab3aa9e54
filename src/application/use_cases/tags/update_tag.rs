use crate::application::dto::tags::TagDto;
use crate::application::ports::store_error::{StoreResult, parse_id};
use crate::application::ports::tag_repository::TagRepository;

pub struct UpdateTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> UpdateTag<'a, R> {
    pub async fn execute(&self, id: &str, label: &str) -> StoreResult<TagDto> {
        let id = parse_id("tag", id)?;
        let tag = self.repo.update(id, label).await?;
        Ok(tag.into())
    }
}
