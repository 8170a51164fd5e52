use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courtside_shared::Error;
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Social(#[from] Error),

    #[error("Missing or invalid credentials")]
    Unauthenticated,

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    code: &'a str,
    message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Social(err) => err.code(),
            AppError::Unauthenticated => "NotAuthorized",
            AppError::InternalError(_) => "Internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        let AppError::Social(err) = self else {
            return match self {
                AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        };

        match err {
            Error::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::NotRegistered => StatusCode::NOT_FOUND,
            Error::AlreadyRegistered
            | Error::InvalidTransition(_)
            | Error::RegistrationClosed => StatusCode::CONFLICT,
            Error::IneligibleGender(_)
            | Error::OutsideCheckinWindow
            | Error::OutsideCancellationWindow
            | Error::Validate(_)
            | Error::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotAuthorized => StatusCode::FORBIDDEN,
            Error::Contention => StatusCode::SERVICE_UNAVAILABLE,
            Error::Server(_) | Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(err = ?self, "request failed");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            success: false,
            code: self.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
