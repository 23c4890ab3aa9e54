use std::sync::Arc;

use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::tag_posts_query::TagPostsQuery;
use crate::application::ports::tag_repository::TagRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    tag_repo: Arc<dyn TagRepository>,
    tag_posts: Arc<dyn TagPostsQuery>,
    post_repo: Arc<dyn PostRepository>,
}

impl AppServices {
    pub fn new(
        tag_repo: Arc<dyn TagRepository>,
        tag_posts: Arc<dyn TagPostsQuery>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            tag_repo,
            tag_posts,
            post_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn tag_repo(&self) -> Arc<dyn TagRepository> {
        self.services.tag_repo.clone()
    }

    pub fn tag_posts(&self) -> Arc<dyn TagPostsQuery> {
        self.services.tag_posts.clone()
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }
}
