use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or out-of-range input
    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },
    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Cost settings or service configuration unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ConfigError(_) | Self::Database(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut error = json!({
            "message": self.to_string(),
            "type": error_type_name(&self),
        });
        if let Self::Validation { field, .. } = &self {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Validation { .. } => "validation_error",
        AppError::NotFound { .. } => "not_found",
        AppError::ConfigError(_) => "config_error",
        AppError::Database(_) => "database_error",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("body", rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::not_found("Route", "r-42");
        assert_eq!(error.to_string(), "Route not found: r-42");

        let error = AppError::validation("margin", "Margin must be between 0 and 1");
        assert_eq!(
            error.to_string(),
            "Validation error on `margin`: Margin must be between 0 and 1"
        );
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(error_type_name(&AppError::validation("x", "y")), "validation_error");
        assert_eq!(error_type_name(&AppError::not_found("Offer", "o")), "not_found");
        assert_eq!(error_type_name(&AppError::ConfigError("x".into())), "config_error");
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response = AppError::validation("margin", "too large").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::not_found("Route", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::ConfigError("no active cost settings".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_response_names_field() {
        let response = AppError::validation("margin", "too large").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["type"], "validation_error");
        assert_eq!(body["error"]["field"], "margin");
    }
}
