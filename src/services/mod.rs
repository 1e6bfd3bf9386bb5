// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod contact_limiter;
pub mod notification_service;
pub mod order_service;
pub mod product_service;
pub mod report_service;
pub mod session_store;
pub mod settings_service;
pub mod telegram_client;

pub use auth_service::*;
pub use contact_limiter::*;
pub use notification_service::*;
pub use order_service::*;
pub use product_service::*;
pub use report_service::*;
pub use session_store::*;
pub use settings_service::*;
pub use telegram_client::*;
