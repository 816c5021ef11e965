use axum::http::StatusCode;
use thiserror::Error;

use crate::handler::MAX_LINK_LENGTH;

/// Request failures, each rendered as the page with an error message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Error parsing form.")]
    BadForm,

    #[error("Link cannot be empty.")]
    EmptyLink,

    #[error("Link exceeds maximum length of {} bytes.", MAX_LINK_LENGTH)]
    LinkTooLong,

    #[error("Link not found.")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The stored link cannot be sent as a `Location` header
    #[error("Link cannot be used as a redirect target.")]
    BadRedirectTarget,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadForm | AppError::EmptyLink | AppError::LinkTooLong => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRedirectTarget => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
