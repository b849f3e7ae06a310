use uuid::Uuid;

use super::{
    dto::{CreateProductRequest, UpdateProductRequest},
    repo::ProductRepository,
    repo_types::{NewProduct, Product, ProductChanges, DEFAULT_CATEGORY},
};
use crate::{
    error::AppError,
    validation::{required, required_if_present},
};

pub async fn create_product(
    repo: &dyn ProductRepository,
    req: CreateProductRequest,
) -> Result<Product, AppError> {
    let product = NewProduct {
        name: required("name", req.name)?,
        category: req
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        quantity: req.quantity.unwrap_or(0.0),
        price: req.price.unwrap_or(0.0),
    };
    repo.insert(product).await
}

pub async fn update_product(
    repo: &dyn ProductRepository,
    id: Uuid,
    req: UpdateProductRequest,
) -> Result<Product, AppError> {
    let changes = ProductChanges {
        name: required_if_present("name", req.name)?,
        category: required_if_present("category", req.category)?,
        quantity: req.quantity,
        price: req.price,
    };
    repo.update(id, changes).await?.ok_or_else(not_found)
}

pub fn not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}
