//! Author identity extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use crate::middleware::error::AppError;
use crate::state::AppState;

pub const AUTHOR_HEADER: &str = "X-Author-Id";

/// The opaque author id a request acts as.
///
/// Taken verbatim from the `X-Author-Id` header, or the configured default
/// when the header is absent. There is no authentication behind it.
#[derive(Debug, Clone)]
pub struct Author(pub String);

impl FromRequest for Author {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(value) = req.headers().get(AUTHOR_HEADER) {
            return ready(match value.to_str() {
                Ok(author) if !author.is_empty() => Ok(Author(author.to_string())),
                _ => Err(AppError::BadRequest(format!(
                    "{AUTHOR_HEADER} must be a non-empty visible ASCII string"
                ))),
            });
        }

        match req.app_data::<web::Data<AppState>>() {
            Some(state) => ready(Ok(Author(state.default_author_id.clone()))),
            None => {
                tracing::error!("AppState not found in app data");
                ready(Err(AppError::Internal(
                    "Server configuration error".to_string(),
                )))
            }
        }
    }
}
