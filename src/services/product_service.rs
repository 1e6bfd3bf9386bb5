// src/services/product_service.rs
// DOCUMENTATION: Business logic for the catalog
// PURPOSE: Intermediary between product handlers and repository

use crate::db::ProductRepository;
use crate::errors::StoreError;
use crate::models::{
    CreateProductRequest, CreateProductResponse, Product, ProductQuery, UpdateProductRequest,
};
use crate::models::input::non_empty;
use sqlx::PgPool;

pub struct ProductService;

impl ProductService {
    pub async fn list_products(pool: &PgPool, query: ProductQuery) -> Result<Vec<Product>, StoreError> {
        let category = non_empty(&query.category);
        ProductRepository::list(pool, category).await
    }

    pub async fn get_product(pool: &PgPool, id: i64) -> Result<Product, StoreError> {
        ProductRepository::get_by_id(pool, id).await
    }

    pub async fn create_product(
        pool: &PgPool,
        req: CreateProductRequest,
    ) -> Result<CreateProductResponse, StoreError> {
        let product = req.into_new_product()?;
        let product_id = ProductRepository::create(pool, &product).await?;

        Ok(CreateProductResponse {
            success: true,
            message: "Product created successfully".to_string(),
            product_id,
        })
    }

    pub async fn update_product(pool: &PgPool, req: UpdateProductRequest) -> Result<(), StoreError> {
        let update = req.into_update()?;
        ProductRepository::update(pool, &update).await
    }

    pub async fn delete_product(pool: &PgPool, id: i64) -> Result<(), StoreError> {
        ProductRepository::delete(pool, id).await
    }
}
