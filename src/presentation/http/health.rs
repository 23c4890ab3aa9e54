use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::db::PgPool;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub database: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, body = HealthResp),
        (status = 503, body = HealthResp, description = "Database unreachable")
    )
)]
pub async fn health(State(pool): State<PgPool>) -> (StatusCode, Json<HealthResp>) {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await
        .is_ok();
    if db_ok {
        (
            StatusCode::OK,
            Json(HealthResp {
                status: "ok",
                database: "up",
            }),
        )
    } else {
        tracing::warn!("health_check_database_down");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResp {
                status: "degraded",
                database: "down",
            }),
        )
    }
}

pub fn routes(pool: PgPool) -> Router {
    Router::new().route("/health", get(health)).with_state(pool)
}
