use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{
    dto::{CreateSupplierRequest, UpdateSupplierRequest},
    repo_types::Supplier,
    services::{self, not_found},
};
use crate::{error::AppError, state::AppState, validation::parse_id};

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<CreateSupplierRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let Json(payload) = payload?;
    let supplier = services::create_supplier(state.suppliers.as_ref(), payload).await?;
    info!(supplier_id = %supplier.id, "supplier created");
    Ok((StatusCode::CREATED, Json(supplier)))
}

#[instrument(skip(state))]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(state.suppliers.list().await?))
}

/// Unknown and malformed ids both answer 404.
#[instrument(skip(state))]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Supplier>, AppError> {
    let id = parse_id(&id, not_found)?;
    state
        .suppliers
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, payload))]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSupplierRequest>, JsonRejection>,
) -> Result<Json<Supplier>, AppError> {
    let id = parse_id(&id, not_found)?;
    let Json(payload) = payload?;
    Ok(Json(
        services::update_supplier(state.suppliers.as_ref(), id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, not_found)?;
    if !state.suppliers.delete(id).await? {
        return Err(not_found());
    }
    info!(supplier_id = %id, "supplier deleted");
    Ok(Json(json!({ "message": "Supplier deleted" })))
}
