//! In-memory implementation of the store ports used by unit and router tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::store_error::{StoreError, StoreResult};
use crate::application::ports::tag_posts_query::TagPostsQuery;
use crate::application::ports::tag_repository::TagRepository;
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::posts::post::{Post, PostDraft};
use crate::domain::tags::tag::{Tag, TagWithPosts};

#[derive(Default)]
struct State {
    tags: BTreeMap<Uuid, String>,
    posts: BTreeMap<Uuid, StoredPost>,
    links: BTreeSet<(Uuid, Uuid)>, // (tag_id, post_id)
}

#[derive(Clone)]
struct StoredPost {
    title: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl State {
    fn tag_with_posts(&self, id: Uuid) -> Option<TagWithPosts> {
        let label = self.tags.get(&id)?.clone();
        let titles: BTreeSet<String> = self
            .links
            .iter()
            .filter(|(t, _)| *t == id)
            .filter_map(|(_, p)| self.posts.get(p).map(|p| p.title.clone()))
            .collect();
        Some(TagWithPosts {
            id,
            label,
            posts: titles.into_iter().collect(),
        })
    }

    fn post(&self, id: Uuid) -> Option<Post> {
        let stored = self.posts.get(&id)?;
        let labels: BTreeSet<String> = self
            .links
            .iter()
            .filter(|(_, p)| *p == id)
            .filter_map(|(t, _)| self.tags.get(t).cloned())
            .collect();
        Some(Post {
            id,
            title: stored.title.clone(),
            content: stored.content.clone(),
            tags: labels.into_iter().collect(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    fn check_tags(&self, op: &'static str, ids: &[Uuid]) -> StoreResult<()> {
        match ids.iter().find(|id| !self.tags.contains_key(id)) {
            Some(missing) => Err(StoreError::not_found("tag", op, *missing)),
            None => Ok(()),
        }
    }
}

/// Context whose every port is backed by `store`, with default config.
pub fn app_context(store: Arc<InMemoryStore>) -> AppContext {
    let cfg = Config::from_lookup(|_| None).expect("default config");
    let services = AppServices::new(store.clone(), store.clone(), store);
    AppContext::new(cfg, services)
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a persistence error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn tag_count(&self) -> usize {
        self.state.lock().unwrap().tags.len()
    }

    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    fn guard(
        &self,
        op: &'static str,
        id: Option<Uuid>,
    ) -> StoreResult<std::sync::MutexGuard<'_, State>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence {
                op,
                id,
                source: anyhow::anyhow!("connection refused"),
            });
        }
        Ok(self.state.lock().unwrap())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn create(&self, label: &str) -> StoreResult<Tag> {
        let mut st = self.guard("tag.create", None)?;
        let id = Uuid::new_v4();
        st.tags.insert(id, label.to_string());
        Ok(Tag {
            id,
            label: label.to_string(),
        })
    }

    async fn update(&self, id: Uuid, label: &str) -> StoreResult<Tag> {
        let mut st = self.guard("tag.update", Some(id))?;
        match st.tags.get_mut(&id) {
            Some(existing) => {
                *existing = label.to_string();
                Ok(Tag {
                    id,
                    label: label.to_string(),
                })
            }
            None => Err(StoreError::not_found("tag", "tag.update", id)),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Uuid> {
        let mut st = self.guard("tag.delete", Some(id))?;
        if st.tags.remove(&id).is_none() {
            return Err(StoreError::not_found("tag", "tag.delete", id));
        }
        st.links.retain(|(t, _)| *t != id);
        Ok(id)
    }
}

#[async_trait]
impl TagPostsQuery for InMemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<TagWithPosts>> {
        let st = self.guard("tag.list", None)?;
        let mut out: Vec<TagWithPosts> = st
            .tags
            .keys()
            .filter_map(|id| st.tag_with_posts(*id))
            .collect();
        out.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> StoreResult<TagWithPosts> {
        let st = self.guard("tag.get", Some(id))?;
        st.tag_with_posts(id)
            .ok_or_else(|| StoreError::not_found("tag", "tag.get", id))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, draft: &PostDraft) -> StoreResult<Post> {
        let mut st = self.guard("post.create", None)?;
        let tag_ids = draft.distinct_tag_ids();
        st.check_tags("post.create", &tag_ids)?;
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        st.posts.insert(
            id,
            StoredPost {
                title: draft.title.clone(),
                content: draft.content.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        for tag_id in tag_ids {
            st.links.insert((tag_id, id));
        }
        Ok(st.post(id).expect("post just inserted"))
    }

    async fn update(&self, id: Uuid, draft: &PostDraft) -> StoreResult<Post> {
        let mut st = self.guard("post.update", Some(id))?;
        if !st.posts.contains_key(&id) {
            return Err(StoreError::not_found("post", "post.update", id));
        }
        let tag_ids = draft.distinct_tag_ids();
        st.check_tags("post.update", &tag_ids)?;
        if let Some(p) = st.posts.get_mut(&id) {
            p.title = draft.title.clone();
            p.content = draft.content.clone();
            p.updated_at = chrono::Utc::now();
        }
        st.links.retain(|(_, p)| *p != id);
        for tag_id in tag_ids {
            st.links.insert((tag_id, id));
        }
        Ok(st.post(id).expect("post exists"))
    }

    async fn list(&self, labels: &[String]) -> StoreResult<Vec<Post>> {
        let st = self.guard("post.list", None)?;
        let mut out: Vec<Post> = st
            .posts
            .keys()
            .filter_map(|id| st.post(*id))
            .filter(|p| labels.is_empty() || p.tags.iter().any(|t| labels.contains(t)))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Post> {
        let st = self.guard("post.get", Some(id))?;
        st.post(id)
            .ok_or_else(|| StoreError::not_found("post", "post.get", id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Uuid> {
        let mut st = self.guard("post.delete", Some(id))?;
        if st.posts.remove(&id).is_none() {
            return Err(StoreError::not_found("post", "post.delete", id));
        }
        st.links.retain(|(_, p)| *p != id);
        Ok(id)
    }
}
