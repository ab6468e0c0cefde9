//! Delivery endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ofertactl_core::{
    Delivery, DeliveryDraft, DeliveryPatch, Page, PageParams, Pagination, Validate,
};

use crate::db::DeliveryRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;

/// POST /entregas
async fn create_delivery(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<DeliveryDraft>,
) -> Result<(StatusCode, Json<Delivery>), ApiError> {
    let delivery = DeliveryRepo::new(&state.pool).create(draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

/// GET /entregas
async fn list_deliveries(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Page<Delivery>>, ApiError> {
    let page = Pagination::from(params);
    Ok(Json(DeliveryRepo::new(&state.pool).list(page).await?))
}

/// GET /entregas/{id}
async fn get_delivery(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Delivery>, ApiError> {
    Ok(Json(DeliveryRepo::new(&state.pool).get(id).await?))
}

/// PUT /entregas/{id}
async fn replace_delivery(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(draft): ValidJson<DeliveryDraft>,
) -> Result<Json<Delivery>, ApiError> {
    let patch = DeliveryPatch::from(draft.validate()?);
    Ok(Json(DeliveryRepo::new(&state.pool).update(id, patch).await?))
}

/// PATCH /entregas/{id}
async fn patch_delivery(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<DeliveryPatch>,
) -> Result<Json<Delivery>, ApiError> {
    Ok(Json(DeliveryRepo::new(&state.pool).update(id, patch).await?))
}

/// DELETE /entregas/{id}
async fn delete_delivery(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    DeliveryRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delivery routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/entregas", get(list_deliveries).post(create_delivery))
        .route(
            "/entregas/{id}",
            get(get_delivery)
                .put(replace_delivery)
                .patch(patch_delivery)
                .delete(delete_delivery),
        )
}
