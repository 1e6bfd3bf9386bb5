// src/db/product_repository.rs
// DOCUMENTATION: Database access for the product catalog
// PURPOSE: CRUD queries on the products table

use crate::errors::StoreError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping database rows to Product struct
/// DOCUMENTATION: images/details are JSONB arrays
#[derive(Debug, FromRow)]
struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Json<Vec<String>>,
    pub details: Json<Vec<String>>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn to_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            images: self.images.0,
            details: self.details.0,
            stock: self.stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, image, images, details, stock, created_at, updated_at";

/// ProductRepository: All database operations for products
pub struct ProductRepository;

impl ProductRepository {
    /// List products newest first, optionally restricted to one category
    pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {} FROM products WHERE ($1::text IS NULL OR category = $1) ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Product list query error: {}", e);
                StoreError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(ProductRow::to_product).collect())
    }

    /// Retrieve product by ID
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Product, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching product {}: {}", id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Product not found: {}", id);
                StoreError::NotFound("Product not found".to_string())
            })?;

        Ok(row.to_product())
    }

    /// Insert a product, returns the new id
    pub async fn create(pool: &PgPool, product: &NewProduct) -> Result<i64, StoreError> {
        let inserted: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO products (
                name, description, price, category, image,
                images, details, stock, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.image)
        .bind(Json(&product.images))
        .bind(Json(&product.details))
        .bind(product.stock)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create product {}: {}", product.name, e);
            StoreError::DatabaseError(e.to_string())
        })?;

        log::info!("Created product {} with id: {}", product.name, inserted.0);
        Ok(inserted.0)
    }

    /// Update existing product
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update(pool: &PgPool, update: &ProductUpdate) -> Result<(), StoreError> {
        let rows = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                category = COALESCE($4, category),
                image = COALESCE($5, image),
                images = COALESCE($6, images),
                details = COALESCE($7, details),
                stock = COALESCE($8, stock),
                updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(&update.category)
        .bind(&update.image)
        .bind(update.images.as_ref().map(Json))
        .bind(update.details.as_ref().map(Json))
        .bind(update.stock)
        .bind(update.id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for product {}: {}", update.id, e);
            StoreError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound("Product not found".to_string()));
        }

        log::info!("Updated product: {}", update.id);
        Ok(())
    }

    /// Permanently delete a product
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), StoreError> {
        let rows = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for product {}: {}", id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound("Product not found".to_string()));
        }

        log::info!("Deleted product: {}", id);
        Ok(())
    }
}
