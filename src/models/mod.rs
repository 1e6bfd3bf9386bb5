// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod admin;
pub mod contact;
pub mod input;
pub mod order;
pub mod product;
pub mod report;
pub mod settings;

pub use admin::*;
pub use contact::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use settings::*;
