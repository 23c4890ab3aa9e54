use axum::http::StatusCode;

use crate::application::ports::store_error::StoreError;

/// Maps a store failure onto the response status and logs it. Only
/// persistence failures are server errors; the source chain stays in the log.
pub fn status_for(err: StoreError) -> StatusCode {
    match err {
        StoreError::InvalidId { entity, value } => {
            tracing::debug!(entity, value = %value, "invalid_id");
            StatusCode::BAD_REQUEST
        }
        StoreError::NotFound { entity, op, id } => {
            tracing::debug!(entity, op, %id, "not_found");
            StatusCode::NOT_FOUND
        }
        StoreError::Persistence { op, id, source } => {
            tracing::error!(op, id = ?id, error = ?source, "store_operation_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
