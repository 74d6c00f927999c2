use crate::models::DetectionResponse;
use crate::services::validate_image;
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use service_core::error::AppError;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

pub async fn detect_objects(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::info!(error = %e, "Detection request is not a multipart upload");
        AppError::UnprocessableEntity("No image provided".to_string())
    })?;

    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::info!(error = %e, "Failed to read multipart field");
        AppError::UnprocessableEntity(format!("Failed to read upload: {}", e.body_text()))
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::info!(error = %e, "Failed to read image bytes");
            AppError::UnprocessableEntity(format!("Failed to read upload: {}", e.body_text()))
        })?;
        image = Some(data);
        break;
    }

    let Some(image) = image else {
        tracing::info!("No image provided");
        return Err(AppError::UnprocessableEntity("No image provided".to_string()));
    };

    if !validate_image(&image) {
        tracing::info!(size = image.len(), "Invalid image format");
        return Err(AppError::UnprocessableEntity("Invalid image format".to_string()));
    }

    Ok(Json(state.detector.detect(&image).await))
}
