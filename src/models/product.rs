// src/models/product.rs
// DOCUMENTATION: Catalog data structures
// PURPOSE: Product record plus admin create/update DTOs

use crate::errors::StoreError;
use crate::models::input::{non_empty, parse_amount, parse_integer, round_money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Represents a complete product record from the database
/// DOCUMENTATION: images and details are JSON arrays in the products table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    /// Primary image path shown in listings
    pub image: Option<String>,
    /// Gallery image paths
    pub images: Vec<String>,
    /// Bullet points rendered on the product page
    pub details: Vec<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string for GET /api/products
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// Request DTO for POST /api/admin/products
/// DOCUMENTATION: price/stock accept numbers or numeric strings (HTML form values)
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub details: Option<Vec<String>>,
    pub stock: Option<Value>,
}

/// Validated product fields for inserts
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    pub images: Vec<String>,
    pub details: Vec<String>,
    #[validate(range(min = 0))]
    pub stock: i32,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> Result<NewProduct, StoreError> {
        let (name, price) = match (non_empty(&self.name), self.price.as_ref()) {
            (Some(name), Some(price)) if !price.is_null() => (name.to_string(), price),
            _ => return Err(StoreError::InvalidInput("Missing required fields".to_string())),
        };

        let price = parse_price(Some(price))?;
        let stock = match self.stock.as_ref().filter(|v| !v.is_null()) {
            Some(stock) => parse_stock(stock)?,
            None => 0,
        };

        let product = NewProduct {
            name,
            description: trimmed(self.description),
            price,
            category: trimmed(self.category),
            image: trimmed(self.image),
            images: clean_list(self.images.unwrap_or_default()),
            details: clean_list(self.details.unwrap_or_default()),
            stock,
        };

        product
            .validate()
            .map_err(|e| StoreError::ValidationError(e.to_string()))?;
        Ok(product)
    }
}

/// Request DTO for PUT /api/admin/products/update
/// DOCUMENTATION: All fields except id are optional - only provided fields are updated
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub details: Option<Vec<String>>,
    pub stock: Option<Value>,
}

/// Validated partial update
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductUpdate {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub details: Option<Vec<String>>,
    pub stock: Option<i32>,
}

impl UpdateProductRequest {
    pub fn into_update(self) -> Result<ProductUpdate, StoreError> {
        let raw_id = self
            .id
            .as_ref()
            .filter(|v| !v.is_null())
            .ok_or_else(|| StoreError::InvalidInput("Missing product ID".to_string()))?;
        let id = parse_integer(Some(raw_id))
            .filter(|id| *id > 0)
            .ok_or_else(|| StoreError::InvalidInput("Invalid product ID".to_string()))?;

        let price = match self.price.as_ref() {
            Some(price) => Some(parse_price(Some(price))?),
            None => None,
        };
        let stock = match self.stock.as_ref() {
            Some(stock) => Some(parse_stock(stock)?),
            None => None,
        };

        let update = ProductUpdate {
            id,
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            price,
            category: self.category.map(|c| c.trim().to_string()),
            image: self.image.map(|i| i.trim().to_string()),
            images: self.images.map(clean_list),
            details: self.details.map(clean_list),
            stock,
        };

        update
            .validate()
            .map_err(|e| StoreError::ValidationError(e.to_string()))?;
        Ok(update)
    }
}

fn parse_price(value: Option<&Value>) -> Result<f64, StoreError> {
    parse_amount(value)
        .filter(|p| *p >= 0.0)
        .map(round_money)
        .ok_or_else(|| StoreError::InvalidInput("Invalid price value".to_string()))
}

fn parse_stock(value: &Value) -> Result<i32, StoreError> {
    parse_integer(Some(value))
        .and_then(|s| i32::try_from(s).ok())
        .filter(|s| *s >= 0)
        .ok_or_else(|| StoreError::InvalidInput("Invalid stock value".to_string()))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Response for a created product
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    pub message: String,
    pub product_id: i64,
}
