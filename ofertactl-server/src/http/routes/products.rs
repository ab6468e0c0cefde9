//! Inventory product endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ofertactl_core::{
    Page, PageParams, Pagination, Product, ProductDraft, ProductPatch, ProductWithOffers, Validate,
};
use serde::Deserialize;

use crate::db::ProductRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;

/// Query for the product list
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    /// Inline each product's offers
    #[serde(default)]
    pub con_ofertas: bool,
}

/// POST /inventario-productos
async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = ProductRepo::new(&state.pool).create(draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /inventario-productos - paginated, optionally with offers
async fn list_products(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ProductListParams>,
) -> Result<Response, ApiError> {
    let repo = ProductRepo::new(&state.pool);
    let page = Pagination::from(PageParams {
        skip: params.skip,
        limit: params.limit,
    });

    if params.con_ofertas {
        let result: Page<ProductWithOffers> = repo.list_with_offers(page).await?;
        Ok(Json(result).into_response())
    } else {
        let result: Page<Product> = repo.list(page).await?;
        Ok(Json(result).into_response())
    }
}

/// GET /inventario-productos/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(ProductRepo::new(&state.pool).get(id).await?))
}

/// GET /inventario-productos/{id}/ofertas
async fn get_product_with_offers(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProductWithOffers>, ApiError> {
    Ok(Json(ProductRepo::new(&state.pool).get_with_offers(id).await?))
}

/// PUT /inventario-productos/{id} - full replacement
async fn replace_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(draft): ValidJson<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
    let patch = ProductPatch::from(draft.validate()?);
    Ok(Json(ProductRepo::new(&state.pool).update(id, patch).await?))
}

/// PATCH /inventario-productos/{id}
async fn patch_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(ProductRepo::new(&state.pool).update(id, patch).await?))
}

/// DELETE /inventario-productos/{id} - offers go with it
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    ProductRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/inventario-productos",
            get(list_products).post(create_product),
        )
        .route(
            "/inventario-productos/{id}",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route(
            "/inventario-productos/{id}/ofertas",
            get(get_product_with_offers),
        )
}
