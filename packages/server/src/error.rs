use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_CREDENTIALS`,
    /// `USER_DISABLED`, `USERNAME_TAKEN`, `NOT_FOUND`, `INVALID_AMOUNT`,
    /// `INSUFFICIENT_FUNDS`, `INVALID_LEVEL`, `MEMBERSHIP_REQUIRED`,
    /// `MEMBERSHIP_EXPIRED`, `CONTEST_NOT_FOUND`, `CONTEST_NOT_OPEN`,
    /// `CONTEST_FULL`, `ALREADY_REGISTERED`, `NOT_REGISTERED`,
    /// `ALREADY_FINISHED`, `QUESTION_NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Amount must be positive")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    UserDisabled,
    UsernameTaken,
    NotFound(String),
    Engine(EngineError),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::UserDisabled => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "USER_DISABLED",
                    message: "This account has been disabled".into(),
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Engine(err) => engine_status_and_body(err),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

fn engine_status_and_body(err: EngineError) -> (StatusCode, ErrorBody) {
    let code = match err {
        EngineError::InvalidAmount(_) => "INVALID_AMOUNT",
        EngineError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        EngineError::InvalidLevel(_) => "INVALID_LEVEL",
        EngineError::MembershipRequired => "MEMBERSHIP_REQUIRED",
        EngineError::MembershipExpired => "MEMBERSHIP_EXPIRED",
        EngineError::ContestNotFound => "CONTEST_NOT_FOUND",
        EngineError::ContestNotOpen => "CONTEST_NOT_OPEN",
        EngineError::ContestFull => "CONTEST_FULL",
        EngineError::AlreadyRegistered => "ALREADY_REGISTERED",
        EngineError::NotRegistered => "NOT_REGISTERED",
        EngineError::AlreadyFinished => "ALREADY_FINISHED",
        EngineError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
    };
    let status = match err {
        EngineError::InvalidAmount(_)
        | EngineError::InsufficientFunds { .. }
        | EngineError::InvalidLevel(_) => StatusCode::BAD_REQUEST,
        EngineError::MembershipRequired | EngineError::MembershipExpired => StatusCode::FORBIDDEN,
        EngineError::ContestNotFound
        | EngineError::NotRegistered
        | EngineError::QuestionNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ContestNotOpen
        | EngineError::ContestFull
        | EngineError::AlreadyRegistered
        | EngineError::AlreadyFinished => StatusCode::CONFLICT,
    };
    (
        status,
        ErrorBody {
            code,
            message: err.to_string(),
        },
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}
