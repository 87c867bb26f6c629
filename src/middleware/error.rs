use std::fmt;

use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CtxError {
    pub error: AppError,
    pub req_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    Generic { description: String },
    Validation { description: String },
    NoDataFound,
    CreateFailed,
    UpdateFailed,
    RemoveFailed,
    SomethingWentWrong,
    NotAllowedRequest,
    Blocked,
    AuthenticationFail,
    AuthorizationFail { required: String },
    AuthFailNoJwtCookie,
    AuthFailJwtInvalid { source: String },
    AuthFailCtxNotInRequestExt,
    Serde { source: String },
    SurrealDb { source: String },
}

/// Handler level result, carries the request id reported back to the client.
pub type CtxResult<T> = core::result::Result<T, CtxError>;
/// Repository level result, turned into a `CtxError` once it reaches a handler.
pub type AppResult<T> = core::result::Result<T, AppError>;

impl std::error::Error for AppError {}

impl CtxError {
    pub fn new(error: AppError) -> Self {
        CtxError {
            error,
            req_id: Uuid::new_v4(),
        }
    }
}

impl From<AppError> for CtxError {
    fn from(value: AppError) -> Self {
        CtxError::new(value)
    }
}

impl From<surrealdb::Error> for CtxError {
    fn from(value: surrealdb::Error) -> Self {
        CtxError::new(value.into())
    }
}

impl From<ValidationErrors> for CtxError {
    fn from(value: ValidationErrors) -> Self {
        CtxError::new(value.into())
    }
}

pub mod message {
    pub const NO_DATA_FOUND: &str = "No data is found!";
    pub const CREATE_FAILED: &str = "Create is failed!";
    pub const UPDATE_FAILED: &str = "Update is failed!";
    pub const REMOVE_FAILED: &str = "Remove is failed!";
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong!";
    pub const NOT_ALLOWED_REQUEST: &str = "Not allowed request!";
    pub const BLOCKED_USER: &str = "You have been blocked!";
    pub const WRONG_PASSWORD: &str = "Wrong password, try again!";
    pub const NOT_AUTHENTICATED: &str = "You are not authenticated, please login first!";
    pub const TOKEN_NOT_VALID: &str = "The provided token is not valid";
    pub const ONLY_SPECIFIC_ROLES_ALLOWED: &str = "Allowed only for members with specific roles!";
    pub const INTERNAL: &str = "Internal error";
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic { description } => write!(f, "{description}"),
            Self::Validation { description } => write!(f, "{description}"),
            Self::NoDataFound => write!(f, "{}", message::NO_DATA_FOUND),
            Self::CreateFailed => write!(f, "{}", message::CREATE_FAILED),
            Self::UpdateFailed => write!(f, "{}", message::UPDATE_FAILED),
            Self::RemoveFailed => write!(f, "{}", message::REMOVE_FAILED),
            Self::SomethingWentWrong => write!(f, "{}", message::SOMETHING_WENT_WRONG),
            Self::NotAllowedRequest => write!(f, "{}", message::NOT_ALLOWED_REQUEST),
            Self::Blocked => write!(f, "{}", message::BLOCKED_USER),
            Self::AuthenticationFail => write!(f, "{}", message::WRONG_PASSWORD),
            Self::AuthorizationFail { .. } => {
                write!(f, "{}", message::ONLY_SPECIFIC_ROLES_ALLOWED)
            }
            Self::AuthFailNoJwtCookie => write!(f, "{}", message::NOT_AUTHENTICATED),
            Self::AuthFailJwtInvalid { .. } => write!(f, "{}", message::TOKEN_NOT_VALID),
            Self::AuthFailCtxNotInRequestExt => write!(f, "{}", message::INTERNAL),
            Self::Serde { source } => write!(f, "Serde error - {source}"),
            Self::SurrealDb { .. } => write!(f, "{}", message::INTERNAL),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoDataFound => StatusCode::NOT_FOUND,
            AppError::Generic { .. }
            | AppError::Validation { .. }
            | AppError::Serde { .. }
            | AppError::CreateFailed
            | AppError::NotAllowedRequest => StatusCode::BAD_REQUEST,
            AppError::AuthenticationFail
            | AppError::AuthFailNoJwtCookie
            | AppError::AuthFailJwtInvalid { .. } => StatusCode::UNAUTHORIZED,
            AppError::Blocked | AppError::AuthorizationFail { .. } => StatusCode::FORBIDDEN,
            AppError::UpdateFailed
            | AppError::RemoveFailed
            | AppError::SomethingWentWrong
            | AppError::AuthFailCtxNotInRequestExt
            | AppError::SurrealDb { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponseBody {
    pub error: String,
    pub req_id: String,
}

impl ErrorResponseBody {
    pub fn new(error: String, req_id: Option<String>) -> Self {
        ErrorResponseBody {
            error,
            req_id: req_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}

impl IntoResponse for CtxError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.error.status_code();
        if status_code.is_server_error() {
            tracing::error!(req_id = %self.req_id, error = ?self.error, "request failed");
        } else {
            tracing::debug!(req_id = %self.req_id, error = ?self.error, "request rejected");
        }
        let body = ErrorResponseBody::new(self.error.to_string(), Some(self.req_id.to_string()));
        (status_code, axum::Json(body)).into_response()
    }
}

// External Errors
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde {
            source: value.to_string(),
        }
    }
}

impl From<surrealdb::Error> for AppError {
    fn from(value: surrealdb::Error) -> Self {
        Self::SurrealDb {
            source: value.to_string(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation {
            description: value.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::AuthFailJwtInvalid {
            source: value.to_string(),
        }
    }
}

impl From<CtxError> for AppError {
    fn from(value: CtxError) -> Self {
        value.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_failed_writes_map_to_fixed_messages() {
        assert_eq!(AppError::NoDataFound.to_string(), message::NO_DATA_FOUND);
        assert_eq!(AppError::CreateFailed.to_string(), message::CREATE_FAILED);
        assert_eq!(AppError::NoDataFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::CreateFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::UpdateFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn surreal_errors_do_not_leak_details() {
        let err = AppError::SurrealDb {
            source: "table job does not exist".to_string(),
        };
        assert_eq!(err.to_string(), message::INTERNAL);
    }
}
