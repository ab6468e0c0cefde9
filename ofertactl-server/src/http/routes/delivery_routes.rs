//! Delivery route endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ofertactl_core::{Page, PageParams, Pagination, Route, RouteDraft, RoutePatch, Validate};

use crate::db::RouteRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;

/// POST /rutas-entrega
async fn create_route(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<RouteDraft>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    let route = RouteRepo::new(&state.pool).create(draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// GET /rutas-entrega
async fn list_routes(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Page<Route>>, ApiError> {
    let page = Pagination::from(params);
    Ok(Json(RouteRepo::new(&state.pool).list(page).await?))
}

/// GET /rutas-entrega/{id}
async fn get_route(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(RouteRepo::new(&state.pool).get(id).await?))
}

/// PUT /rutas-entrega/{id}
async fn replace_route(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(draft): ValidJson<RouteDraft>,
) -> Result<Json<Route>, ApiError> {
    let patch = RoutePatch::from(draft.validate()?);
    Ok(Json(RouteRepo::new(&state.pool).update(id, patch).await?))
}

/// PATCH /rutas-entrega/{id} - `"hora_llegada": null` clears the arrival
async fn patch_route(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<RoutePatch>,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(RouteRepo::new(&state.pool).update(id, patch).await?))
}

/// DELETE /rutas-entrega/{id}
async fn delete_route(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    RouteRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Route routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rutas-entrega", get(list_routes).post(create_route))
        .route(
            "/rutas-entrega/{id}",
            get(get_route)
                .put(replace_route)
                .patch(patch_route)
                .delete(delete_route),
        )
}
