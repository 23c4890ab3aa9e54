use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use taglink::bootstrap::app_context::{AppContext, AppServices};
use taglink::bootstrap::config::Config;
use taglink::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository;
use taglink::infrastructure::db::repositories::tag_posts_query_sqlx::SqlxTagPostsQuery;
use taglink::infrastructure::db::repositories::tag_repository_sqlx::SqlxTagRepository;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            taglink::presentation::http::health::health,
            taglink::presentation::http::tags::create_tag,
            taglink::presentation::http::tags::list_tags,
            taglink::presentation::http::tags::get_tag,
            taglink::presentation::http::tags::update_tag,
            taglink::presentation::http::tags::delete_tag,
            taglink::presentation::http::posts::create_post,
            taglink::presentation::http::posts::list_posts,
            taglink::presentation::http::posts::get_post,
            taglink::presentation::http::posts::update_post,
            taglink::presentation::http::posts::delete_post,
        ),
        components(schemas(
            taglink::presentation::http::health::HealthResp,
            taglink::presentation::http::tags::TagResponse,
            taglink::presentation::http::tags::TagWithPostsResponse,
            taglink::presentation::http::tags::DeletedResponse,
            taglink::presentation::http::tags::CreateTagRequest,
            taglink::presentation::http::tags::UpdateTagRequest,
            taglink::presentation::http::posts::PostResponse,
            taglink::presentation::http::posts::PostRequest,
        )),
        tags(
            (name = "Tags", description = "Tags and their posts"),
            (name = "Posts", description = "Posts and their tags"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::OPTIONS,
    ];
    let origin = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(v)) => AllowOrigin::exact(v),
        Some(Err(_)) if cfg.is_production => {
            // unparsable origin in production: deny all
            AllowOrigin::exact(HeaderValue::from_static("http://invalid"))
        }
        // Development convenience
        _ => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers([http::header::CONTENT_TYPE])
}

fn request_timeout_layer(cfg: &Config) -> TimeoutLayer {
    TimeoutLayer::with_status_code(http::StatusCode::REQUEST_TIMEOUT, cfg.request_timeout())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "taglink=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        production = cfg.is_production,
        "Starting taglink"
    );

    // Database
    let pool = taglink::infrastructure::db::connect_pool(
        &cfg.database_url,
        cfg.db_max_connections,
        cfg.acquire_timeout(),
    )
    .await?;
    taglink::infrastructure::db::migrate(&pool).await?;

    let statement_timeout = cfg.statement_timeout();
    let services = AppServices::new(
        Arc::new(SqlxTagRepository::new(pool.clone(), statement_timeout)),
        Arc::new(SqlxTagPostsQuery::new(pool.clone(), statement_timeout)),
        Arc::new(SqlxPostRepository::new(pool.clone(), statement_timeout)),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest(
            "/api",
            taglink::presentation::http::health::routes(pool.clone()),
        )
        .nest("/api", taglink::presentation::http::tags::routes(ctx.clone()))
        .nest("/api", taglink::presentation::http::posts::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
        // A timed-out request drops its handler future, rolling back any open transaction
        .layer(request_timeout_layer(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    pool.close().await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "failed to listen for shutdown signal");
    }
}
