use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}
