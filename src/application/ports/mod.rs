pub mod post_repository;
pub mod store_error;
pub mod tag_posts_query;
pub mod tag_repository;
