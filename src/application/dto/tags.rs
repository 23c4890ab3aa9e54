use uuid::Uuid;

use crate::domain::tags::tag::{Tag, TagWithPosts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDto {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPostsDto {
    pub id: Uuid,
    pub label: String,
    pub posts: Vec<String>,
}

impl From<Tag> for TagDto {
    fn from(t: Tag) -> Self {
        TagDto {
            id: t.id,
            label: t.label,
        }
    }
}

impl From<TagWithPosts> for TagPostsDto {
    fn from(t: TagWithPosts) -> Self {
        TagPostsDto {
            id: t.id,
            label: t.label,
            posts: t.posts,
        }
    }
}
