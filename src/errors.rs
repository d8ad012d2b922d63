use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::PickupCategory;

/// Errors from the schedule resolution core. All are synchronous and
/// non-retryable: they mean an unsupported municipality or a shape
/// mismatch in upstream data, not a transient fault.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("no pickup rules registered for city: {0}")]
    UnsupportedCity(String),

    #[error("unrecognized {category} schedule format: {value:?}")]
    UnrecognizedFormat {
        category: PickupCategory,
        value: String,
    },

    #[error("no {0} schedule available for this address")]
    UnresolvableSchedule(PickupCategory),

    #[error("ordinal {0} out of range, expected 1-5")]
    InvalidOrdinal(u8),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("session store error: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("geocoding error: {0}")]
    Geocoding(String),

    #[error("GIS lookup error: {0}")]
    Gis(String),

    #[error("reminder API error: {0}")]
    Reminder(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Geocoding(_) => StatusCode::BAD_GATEWAY,
            AppError::Gis(_) => StatusCode::BAD_GATEWAY,
            AppError::Reminder(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
