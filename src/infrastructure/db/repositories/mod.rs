pub mod post_repository_sqlx;
pub mod tag_posts_query_sqlx;
pub mod tag_repository_sqlx;
