//! Featured image upload.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use bloghub_core::domain::ImageUpload;
use bloghub_shared::dto::UploadResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub const FILENAME_HEADER: &str = "X-Filename";

/// POST /api/uploads
///
/// The body is the raw image. `Content-Type` gives its type and
/// `X-Filename` its original name.
pub async fn upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let content_type = header_str(&req, header::CONTENT_TYPE.as_str());
    let original_name = header_str(&req, FILENAME_HEADER);

    let image = ImageUpload::new(original_name, content_type, body.to_vec())?;
    let stored = state.images.put(image).await?;

    tracing::info!(url = %stored.url, size = stored.size, "Image uploaded");

    Ok(HttpResponse::Created().json(UploadResponse {
        url: stored.url,
        filename: stored.filename,
        size: stored.size,
        content_type: stored.content_type,
    }))
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
