//! Discounted offer endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ofertactl_core::{Offer, OfferDraft, OfferPatch, Page, PageParams, Pagination, Validate};

use crate::db::OfferRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;

/// POST /ofertas-reducidas
async fn create_offer(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<OfferDraft>,
) -> Result<(StatusCode, Json<Offer>), ApiError> {
    let offer = OfferRepo::new(&state.pool).create(draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// GET /ofertas-reducidas
async fn list_offers(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Page<Offer>>, ApiError> {
    let page = Pagination::from(params);
    Ok(Json(OfferRepo::new(&state.pool).list(page).await?))
}

/// GET /ofertas-reducidas/{id}
async fn get_offer(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Offer>, ApiError> {
    Ok(Json(OfferRepo::new(&state.pool).get(id).await?))
}

/// PUT /ofertas-reducidas/{id}
async fn replace_offer(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(draft): ValidJson<OfferDraft>,
) -> Result<Json<Offer>, ApiError> {
    let patch = OfferPatch::from(draft.validate()?);
    Ok(Json(OfferRepo::new(&state.pool).update(id, patch).await?))
}

/// PATCH /ofertas-reducidas/{id} - window is re-checked against stored bounds
async fn patch_offer(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<OfferPatch>,
) -> Result<Json<Offer>, ApiError> {
    Ok(Json(OfferRepo::new(&state.pool).update(id, patch).await?))
}

/// DELETE /ofertas-reducidas/{id}
async fn delete_offer(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    OfferRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Offer routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ofertas-reducidas", get(list_offers).post(create_offer))
        .route(
            "/ofertas-reducidas/{id}",
            get(get_offer)
                .put(replace_offer)
                .patch(patch_offer)
                .delete(delete_offer),
        )
}
