//! Product catalog route handlers.

use axum::Json;
use axum::extract::Path;

use volt_core::ProductId;
use volt_core::catalog::{Catalog, Product};

use crate::error::{AppError, Result};

/// `GET /products`
pub async fn index() -> Json<Vec<Product>> {
    Json(Catalog::all().to_vec())
}

/// `GET /products/{id}`
pub async fn show(Path(id): Path<String>) -> Result<Json<Product>> {
    Catalog::get(&ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))
}
