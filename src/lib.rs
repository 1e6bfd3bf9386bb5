// src/lib.rs
// DOCUMENTATION: Library root shared by the server and the bootstrap binary
// PURPOSE: Expose application modules

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
