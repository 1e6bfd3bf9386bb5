// src/bin/init_admin.rs
// DOCUMENTATION: One-shot bootstrap for a fresh database
// PURPOSE: Apply migrations, seed the settings row, create or reset the admin account
//
// Usage: ADMIN_USERNAME=admin ADMIN_PASSWORD=secret cargo run --bin init_admin

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use std::env;
use storefront::config::{init_db_pool, run_migrations, Config};
use storefront::db::{AdminRepository, SettingsRepository};
use storefront::models::MIN_PASSWORD_LENGTH;
use storefront::services::hash_password;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,sqlx=warn");
    }
    env_logger::init();

    let config = Config::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    let username = env::var("ADMIN_USERNAME")
        .map(|u| u.trim().to_string())
        .unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if username.is_empty() {
        bail!("ADMIN_USERNAME must not be empty");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "ADMIN_PASSWORD must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }

    let pool = init_db_pool(&config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    if SettingsRepository::ensure_row(&pool).await? {
        log::info!("Created empty settings row");
    }

    let hash = hash_password(&password).context("failed to hash password")?;
    let id = AdminRepository::upsert(&pool, &username, &hash).await?;
    log::info!("Admin account '{}' ready (id {})", username, id);

    pool.close().await;
    Ok(())
}
