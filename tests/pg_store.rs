//! Store tests against a live Postgres. Set `TEST_DATABASE_URL` to run them;
//! without it every test returns early.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use taglink::application::ports::post_repository::PostRepository;
use taglink::application::ports::store_error::StoreError;
use taglink::application::ports::tag_posts_query::TagPostsQuery;
use taglink::application::ports::tag_repository::TagRepository;
use taglink::domain::posts::post::PostDraft;
use taglink::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository;
use taglink::infrastructure::db::repositories::tag_posts_query_sqlx::SqlxTagPostsQuery;
use taglink::infrastructure::db::repositories::tag_repository_sqlx::SqlxTagRepository;
use taglink::infrastructure::db::{PgPool, begin, connect_pool, migrate};
use uuid::Uuid;

// Tests share one database; row-count assertions need them to run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

struct Stores {
    _serial: MutexGuard<'static, ()>,
    pool: PgPool,
    tags: SqlxTagRepository,
    query: SqlxTagPostsQuery,
    posts: SqlxPostRepository,
}

async fn stores() -> Option<Stores> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return None;
    };
    let serial = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let pool = connect_pool(&url, 5, Duration::from_secs(10))
        .await
        .expect("connect to TEST_DATABASE_URL");
    migrate(&pool).await.expect("apply migrations");
    let timeout = Some(Duration::from_secs(5));
    Some(Stores {
        _serial: serial,
        tags: SqlxTagRepository::new(pool.clone(), timeout),
        query: SqlxTagPostsQuery::new(pool.clone(), timeout),
        posts: SqlxPostRepository::new(pool.clone(), timeout),
        pool,
    })
}

fn draft(title: &str, tag_ids: Vec<Uuid>) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: String::new(),
        tag_ids,
    }
}

async fn links_for_tag(pool: &PgPool, tag_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM post_tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn tag_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn created_tag_reads_back_with_empty_posts() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("go").await.unwrap();
    assert!(!tag.id.is_nil());
    assert_eq!(tag.label, "go");

    let fetched = s.query.get(tag.id).await.unwrap();
    assert_eq!(fetched.label, "go");
    assert!(fetched.posts.is_empty());
}

#[tokio::test]
async fn update_of_missing_tag_is_not_found() {
    let Some(s) = stores().await else { return };
    s.tags.create("bystander").await.unwrap();
    let before = tag_rows(&s.pool).await;

    let missing = Uuid::new_v4();
    let err = s.tags.update(missing, "nope").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id, .. } if id == missing));
    assert_eq!(tag_rows(&s.pool).await, before);
}

#[tokio::test]
async fn update_returns_the_stored_row() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("old").await.unwrap();
    let updated = s.tags.update(tag.id, "new").await.unwrap();
    assert_eq!(updated.id, tag.id);
    assert_eq!(updated.label, "new");
    assert_eq!(s.query.get(tag.id).await.unwrap().label, "new");
}

#[tokio::test]
async fn delete_removes_every_link_of_the_tag() {
    let Some(s) = stores().await else { return };
    let doomed = s.tags.create("doomed").await.unwrap();
    let kept = s.tags.create("kept").await.unwrap();
    let a = s
        .posts
        .create(&draft("a", vec![doomed.id, kept.id]))
        .await
        .unwrap();
    s.posts.create(&draft("b", vec![doomed.id])).await.unwrap();
    assert_eq!(links_for_tag(&s.pool, doomed.id).await, 2);

    assert_eq!(s.tags.delete(doomed.id).await.unwrap(), doomed.id);
    assert_eq!(links_for_tag(&s.pool, doomed.id).await, 0);
    assert_eq!(links_for_tag(&s.pool, kept.id).await, 1);

    let all = s.query.list_all().await.unwrap();
    assert!(all.iter().all(|t| t.id != doomed.id));
    assert!(s.query.get(doomed.id).await.unwrap_err().is_not_found());
    assert_eq!(s.posts.get(a.id).await.unwrap().tags, vec!["kept"]);
}

#[tokio::test]
async fn delete_of_missing_tag_rolls_back() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("survivor").await.unwrap();
    s.posts.create(&draft("p", vec![tag.id])).await.unwrap();

    let err = s.tags.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(links_for_tag(&s.pool, tag.id).await, 1);
}

#[tokio::test]
async fn aggregation_lists_distinct_titles_without_nulls() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("three").await.unwrap();
    let empty = s.tags.create("lonely").await.unwrap();
    for title in ["gamma", "alpha", "beta"] {
        s.posts
            .create(&draft(title, vec![tag.id, tag.id]))
            .await
            .unwrap();
    }

    let all = s.query.list_all().await.unwrap();
    let row = all.iter().find(|t| t.id == tag.id).unwrap();
    assert_eq!(row.posts, vec!["alpha", "beta", "gamma"]);
    let lonely: Vec<_> = all.iter().filter(|t| t.id == empty.id).collect();
    assert_eq!(lonely.len(), 1);
    assert!(lonely[0].posts.is_empty());
}

#[tokio::test]
async fn empty_titles_are_kept() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("blank").await.unwrap();
    s.posts.create(&draft("", vec![tag.id])).await.unwrap();
    assert_eq!(s.query.get(tag.id).await.unwrap().posts, vec![""]);
}

#[tokio::test]
async fn repeated_get_is_stable() {
    let Some(s) = stores().await else { return };
    let tag = s.tags.create("stable").await.unwrap();
    s.posts.create(&draft("one", vec![tag.id])).await.unwrap();
    s.posts.create(&draft("two", vec![tag.id])).await.unwrap();
    let first = s.query.get(tag.id).await.unwrap();
    let second = s.query.get(tag.id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn post_with_unknown_tag_leaves_no_rows() {
    let Some(s) = stores().await else { return };
    let title = format!("orphan-{}", Uuid::new_v4());
    let missing = Uuid::new_v4();
    let err = s
        .posts
        .create(&draft(&title, vec![missing]))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "tag", id, .. } if id == missing));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE title = $1")
        .bind(&title)
        .fetch_one(&s.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn post_update_replaces_links_and_delete_cleans_up() {
    let Some(s) = stores().await else { return };
    let first = s.tags.create("first").await.unwrap();
    let second = s.tags.create("second").await.unwrap();
    let post = s.posts.create(&draft("p", vec![first.id])).await.unwrap();

    let updated = s
        .posts
        .update(post.id, &draft("p2", vec![second.id]))
        .await
        .unwrap();
    assert_eq!(updated.title, "p2");
    assert_eq!(updated.tags, vec!["second"]);
    assert!(s.query.get(first.id).await.unwrap().posts.is_empty());

    assert_eq!(s.posts.delete(post.id).await.unwrap(), post.id);
    assert_eq!(links_for_tag(&s.pool, second.id).await, 0);
    assert!(s.posts.get(post.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn statement_timeout_is_scoped_to_the_transaction() {
    let Some(s) = stores().await else { return };
    let mut tx = begin(&s.pool, Some(Duration::from_millis(50))).await.unwrap();
    let slow = sqlx::query("SELECT pg_sleep(1)").execute(&mut *tx).await;
    assert!(slow.is_err());
    drop(tx);

    let ok: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&s.pool).await.unwrap();
    assert_eq!(ok, 1);
}
