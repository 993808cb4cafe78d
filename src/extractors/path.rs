use axum::extract::{rejection::PathRejection, FromRequestParts};

use crate::error::Error;

/// `axum::extract::Path` where an id that does not parse is a plain 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => Error::NotFound("Not found.".to_string()),
            other => Error::Internal(other.body_text()),
        }
    }
}
