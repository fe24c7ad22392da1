//! Image upload handler.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use folio_shared::dto::UploadResponse;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// POST /api/upload
///
/// Content-Type: multipart/form-data with a single `file` field.
/// The image is returned inline as a `data:` URL.
pub async fn upload_image(
    state: web::Data<AppState>,
    admin: AdminIdentity,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let policy = &state.images;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(FILE_FIELD) {
            // Drain fields we don't care about before moving on.
            while field.try_next().await?.is_some() {}
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.to_string());
        let mime_type = policy.check_type(content_type.as_deref())?;
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            policy.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        let url = policy.encode(Some(&mime_type), &bytes)?;

        tracing::info!(
            filename = filename.as_deref().unwrap_or("-"),
            mime_type = %mime_type,
            size = bytes.len(),
            by = %admin.subject,
            "Image uploaded"
        );

        return Ok(HttpResponse::Ok().json(UploadResponse {
            success: true,
            url,
            filename,
            mime_type,
            size: bytes.len(),
        }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
