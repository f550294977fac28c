use actix_session::{SessionGetError, SessionInsertError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorModel {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
    #[error("Failed to parse value: {0}")]
    ParseError(String),
    #[error("Session holds conflicting principal fields: {0}")]
    InconsistentSession(String),
    #[error(transparent)]
    SessionGet(#[from] SessionGetError),
    #[error(transparent)]
    SessionInsert(#[from] SessionInsertError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ParseError(_) | Error::InconsistentSession(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            Error::InconsistentSession(_) => {
                log::debug!("Client error: {}", self);
                "Your session is invalid, please sign in again."
            }
            Error::ParseError(_) => {
                log::debug!("Client error: {}", self);
                "The requested identifier is not valid."
            }
            _ => {
                log::error!("Internal server error: {}", self);
                "Internal server error"
            }
        };

        HttpResponse::build(status).json(ErrorModel {
            error: message.to_string(),
        })
    }
}
