//! Courier endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ofertactl_core::{
    Courier, CourierDraft, CourierPatch, Delivery, Page, PageParams, Pagination, Route, Validate,
};

use crate::db::{CourierRepo, DeliveryRepo, RouteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;

/// POST /repartidores
async fn create_courier(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<CourierDraft>,
) -> Result<(StatusCode, Json<Courier>), ApiError> {
    let courier = CourierRepo::new(&state.pool).create(draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(courier)))
}

/// GET /repartidores
async fn list_couriers(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Page<Courier>>, ApiError> {
    let page = Pagination::from(params);
    Ok(Json(CourierRepo::new(&state.pool).list(page).await?))
}

/// GET /repartidores/{id}
async fn get_courier(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Courier>, ApiError> {
    Ok(Json(CourierRepo::new(&state.pool).get(id).await?))
}

/// GET /repartidores/{id}/entregas
async fn list_courier_deliveries(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Delivery>>, ApiError> {
    CourierRepo::new(&state.pool).ensure_exists(id).await?;
    Ok(Json(DeliveryRepo::new(&state.pool).list_for_courier(id).await?))
}

/// GET /repartidores/{id}/rutas
async fn list_courier_routes(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Route>>, ApiError> {
    CourierRepo::new(&state.pool).ensure_exists(id).await?;
    Ok(Json(RouteRepo::new(&state.pool).list_for_courier(id).await?))
}

/// PUT /repartidores/{id}
async fn replace_courier(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(draft): ValidJson<CourierDraft>,
) -> Result<Json<Courier>, ApiError> {
    let patch = CourierPatch::from(draft.validate()?);
    Ok(Json(CourierRepo::new(&state.pool).update(id, patch).await?))
}

/// PATCH /repartidores/{id}
async fn patch_courier(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<CourierPatch>,
) -> Result<Json<Courier>, ApiError> {
    Ok(Json(CourierRepo::new(&state.pool).update(id, patch).await?))
}

/// DELETE /repartidores/{id} - deliveries and routes go with it
async fn delete_courier(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    CourierRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Courier routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/repartidores", get(list_couriers).post(create_courier))
        .route(
            "/repartidores/{id}",
            get(get_courier)
                .put(replace_courier)
                .patch(patch_courier)
                .delete(delete_courier),
        )
        .route("/repartidores/{id}/entregas", get(list_courier_deliveries))
        .route("/repartidores/{id}/rutas", get(list_courier_routes))
}
