use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Labels of the tags linked to the post, sorted.
    pub tags: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<Uuid>,
}

impl PostDraft {
    /// Tag ids in first-seen order with repeats removed, so a draft never
    /// produces two join rows for the same pair.
    pub fn distinct_tag_ids(&self) -> Vec<Uuid> {
        let mut seen = std::collections::HashSet::new();
        self.tag_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Splits a `tags=a,b` query value into trimmed, non-empty labels.
pub fn parse_tag_filter(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
