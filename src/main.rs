// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, background tasks and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use storefront::config::{self, Config};
use storefront::handlers;
use storefront::services::{
    start_limiter_cleanup, start_session_cleanup, ContactLimiter, Notifier, SessionStore,
    TelegramClient,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting storefront service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Database pool and schema
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config::run_migrations(&pool).await {
        log::error!("Failed to apply migrations: {}", e);
        std::process::exit(1);
    }

    // 5. Admin sessions, swept every 5 minutes
    let sessions = Arc::new(SessionStore::new(
        config.session_timeout(),
        config.csrf_expiry(),
    ));
    start_session_cleanup(sessions.clone(), 300);

    // 6. Contact form limiter
    let limiter = Arc::new(ContactLimiter::new(config.contact_rate_limit_per_hour));
    start_limiter_cleanup(limiter.clone(), 600);
    log::info!(
        "Contact form limit: {} submissions per hour per client",
        config.contact_rate_limit_per_hour
    );

    // 7. Telegram notifications
    let notifier = Notifier::new(pool.clone(), config.clone(), TelegramClient::new());

    // 8. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .app_data(web::Data::new(notifier.clone()))
            // Middleware
            .wrap(handlers::security_headers())
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::routes)
            .default_service(web::to(handlers::route_not_found))
    })
    .bind(&server_addr)?
    .run()
    .await
}
