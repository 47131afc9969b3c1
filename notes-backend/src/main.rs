use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod error;
mod models;
mod sessions;
mod views;

use config::Config;
use db::Database;
use sessions::SessionStore;

pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let sessions = Arc::new(SessionStore::new(Arc::clone(&db), config.session_ttl()));
        Self { db, sessions }
    }
}

/// Open the database and bring it to a usable state. Any failure here stops the process.
fn open_database(config: &Config) -> Result<Database, error::DbError> {
    log::info!("[DB] Opening {}", config.database_url);
    let db = Database::new(&config.database_url, config.db_pool_size)?;

    let user_id = db.seed_defaults(config.seed_sample_notes)?;
    log::info!("[DB] Default account ready (id {})", user_id);

    let purged = db.purge_expired_sessions()?;
    if purged > 0 {
        log::info!("[SESSIONS] Purged {} expired sessions", purged);
    }

    Ok(db)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("notes-backend v{}", env!("CARGO_PKG_VERSION"));

    let db = match open_database(&config) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(db, &config));
    let static_dir = config.static_dir.clone();

    log::info!(
        "Server is running on http://{}:{}",
        config.bind_address,
        config.port
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::health::config_routes)
            .configure(controllers::pages::config)
            .configure(controllers::auth::config)
            .configure(controllers::notes::config)
            .service(Files::new("/static", static_dir.clone()))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
