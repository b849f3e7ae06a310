use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}
