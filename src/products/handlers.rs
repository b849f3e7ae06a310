use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{
    dto::{CreateProductRequest, UpdateProductRequest},
    repo_types::Product,
    services::{self, not_found},
};
use crate::{error::AppError, state::AppState, validation::parse_id};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let Json(payload) = payload?;
    let product = services::create_product(state.products.as_ref(), payload).await?;
    info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list().await?))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id, not_found)?;
    state
        .products
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id, not_found)?;
    let Json(payload) = payload?;
    Ok(Json(
        services::update_product(state.products.as_ref(), id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, not_found)?;
    if !state.products.delete(id).await? {
        return Err(not_found());
    }
    info!(product_id = %id, "product deleted");
    Ok(Json(json!({ "message": "Product deleted" })))
}
