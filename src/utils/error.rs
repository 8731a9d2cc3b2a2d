use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Batch seat claim lost to another booking; carries exactly the
    /// seat ids that were not available.
    #[error("Seats not available: {seats:?}")]
    SeatConflict { seats: Vec<i32> },

    #[error("Ticket already used")]
    AlreadyUsed,

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),
}

impl AppError {
    /// Machine-readable error kind included in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "internal",
            AppError::AuthError(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::ValidationError(_) => "validation_failed",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::SeatConflict { .. } => "seat_conflict",
            AppError::AlreadyUsed => "already_used",
            AppError::Unprocessable(_) => "unprocessable",
            AppError::TooManyRequests(_) => "too_many_requests",
        }
    }
}

// Convert sqlx::Error (database error) to AppError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

// Implement the Responder trait for AppError
// Format all errors into an HTTP response at route level
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = match self {
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
            AppError::SeatConflict { .. } => Status::Conflict,
            AppError::AlreadyUsed => Status::Conflict,
            AppError::Unprocessable(_) => Status::UnprocessableEntity,
            AppError::TooManyRequests(_) => Status::TooManyRequests,
        };

        let mut body = json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        if let AppError::SeatConflict { ref seats } = self {
            body["error"]["seats"] = json!(seats);
        }

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}
