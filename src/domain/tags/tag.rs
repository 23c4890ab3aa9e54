use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub label: String,
}

/// A tag together with the distinct titles of the posts linked to it.
/// `posts` is empty, never absent, for a tag without associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWithPosts {
    pub id: Uuid,
    pub label: String,
    pub posts: Vec<String>,
}

/// Collapses an aggregated text column into a plain list.
///
/// `None` entries are the placeholders an outer join produces for a row with
/// no matches on the other side; they are dropped, never counted as entries.
pub fn collect_present(raw: Vec<Option<String>>) -> Vec<String> {
    raw.into_iter().flatten().collect()
}
