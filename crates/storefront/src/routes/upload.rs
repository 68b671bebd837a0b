//! Image upload forwarding.
//!
//! The storefront does not store media itself. `POST /upload` accepts a
//! multipart form with an `image` field and streams the bytes through to
//! the external media host, returning the hosted URL to the caller.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    media::MediaHost,
    state::AppState,
};

/// The multipart field name carrying the file bytes.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// A file lifted out of the multipart request body.
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

/// POST /upload - Forward an uploaded image to the media host.
#[instrument(skip_all)]
pub async fn forward(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let file = read_image_field(multipart).await?;
    forward_to_media_host(state.media(), file).await
}

/// Pull the `image` field out of the multipart body, if present.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let filename = field.file_name().map(ToOwned::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            return Ok(Some(UploadedFile {
                bytes: bytes.to_vec(),
                filename,
            }));
        }
    }
    Ok(None)
}

/// Hand the file to the media host, or reject the request when the
/// `image` field was absent.
async fn forward_to_media_host(
    media: &dyn MediaHost,
    file: Option<UploadedFile>,
) -> Result<Json<UploadResponse>> {
    let file = file.ok_or(AppError::NoFileUploaded)?;
    let asset = media.upload(file.bytes, file.filename.as_deref()).await?;
    Ok(Json(UploadResponse {
        image_url: asset.url,
    }))
}
