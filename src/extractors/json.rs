use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::Error;

/// `axum::Json` whose rejections use the crate's error body instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => Error::UnsupportedMediaType(e.body_text()),
            other => Error::BadRequest(other.body_text()),
        }
    }
}
