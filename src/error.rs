use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("{0}")]
    OnlineSynthesis(String),

    #[error("{0}")]
    OfflineSynthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidForm(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FORM"),
            AppError::OnlineSynthesis(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ONLINE_TTS_ERROR")
            }
            AppError::OfflineSynthesis(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "OFFLINE_TTS_ERROR")
            }
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_errors_are_server_errors() {
        let err = AppError::OnlineSynthesis("Language not supported: xx".into());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "ONLINE_TTS_ERROR")
        );
        assert_eq!(err.to_string(), "Language not supported: xx");
    }

    #[test]
    fn invalid_form_is_unprocessable() {
        let err = AppError::InvalidForm("missing field `text`".into());
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
