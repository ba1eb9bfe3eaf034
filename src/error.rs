//! Inkstone Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

/// Inkstone 애플리케이션 에러
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to acquire database lock")]
    Lock,
}

/// API 에러 응답 바디 (`{"error": "..."}`)
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(_) | AppError::NotFound(_) => self.to_string(),
            // 내부 상세는 로그로만 남기고 응답에는 노출하지 않음
            other => {
                tracing::error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}

/// 핸들러/레포지토리 결과 타입
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("Name is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("Project").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Lock.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = AppError::Database(rusqlite::Error::InvalidQuery);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
