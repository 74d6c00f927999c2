use crate::models::{AssetQuery, AssetResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use service_core::error::AppError;

fn asset_query(query: Result<Query<AssetQuery>, QueryRejection>) -> Result<AssetQuery, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| AppError::UnprocessableEntity(e.body_text()))
}

/// Generate a new asset for the requested model/type pair.
pub async fn create_asset(
    State(state): State<AppState>,
    query: Result<Query<AssetQuery>, QueryRejection>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = asset_query(query)?;
    tracing::info!(model = %asset.model, asset_type = %asset.asset_type, "Creating asset");

    Ok(Json(state.asset_generator.create(&asset).await))
}

/// Return a previously generated asset, picked at random.
pub async fn get_asset(
    State(state): State<AppState>,
    query: Result<Query<AssetQuery>, QueryRejection>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = asset_query(query)?;

    let response = match state.asset_store.pick_created(&asset).await {
        Ok(Some(file)) => AssetResponse::found(file),
        Ok(None) => AssetResponse::empty(),
        Err(e) => {
            tracing::error!(error = %e, asset = %asset.file_prefix(), "Failed to read stored asset");
            AssetResponse::failure()
        }
    };

    Ok(Json(response))
}
