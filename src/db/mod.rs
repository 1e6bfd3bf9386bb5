// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod admin_repository;
pub mod order_repository;
pub mod product_repository;
pub mod settings_repository;

pub use admin_repository::*;
pub use order_repository::*;
pub use product_repository::*;
pub use settings_repository::*;
