#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Ecozync carbon calculator.
//!
//! Serves the REST API for running calculations, browsing the factor table
//! and survey catalogue, and managing a user's saved calculations. Saved
//! calculations are persisted in a `SQLite` database at `data/ecozync.db`
//! (override with `ECOZYNC_DB_PATH`).
//!
//! Authentication is out of scope: callers identify themselves with an
//! `X-User-Id` header.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use switchy_database::Database;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Shared application state.
pub struct AppState {
    /// Calculation history database.
    pub db: Arc<dyn Database>,
}

/// Registers all `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/factors", web::get().to(handlers::factors))
            .route("/survey", web::get().to(handlers::survey))
            .route("/calculate", web::post().to(handlers::calculate))
            .route(
                "/calculations/stats",
                web::get().to(handlers::calculation_stats),
            )
            .route("/calculations", web::get().to(handlers::list_calculations))
            .route("/calculations", web::post().to(handlers::save_calculation))
            .route(
                "/calculations/{id}",
                web::get().to(handlers::get_calculation),
            )
            .route(
                "/calculations/{id}",
                web::delete().to(handlers::delete_calculation),
            ),
    );
}

/// Path of the history database from `ECOZYNC_DB_PATH`.
#[must_use]
pub fn db_path_from_env() -> PathBuf {
    std::env::var("ECOZYNC_DB_PATH")
        .map_or_else(|_| PathBuf::from(ecozync_history::DEFAULT_DB_PATH), PathBuf::from)
}

/// Starts the Ecozync API server.
///
/// Opens the history database and starts the Actix-Web HTTP server on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). This is a regular async
/// function; the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the database cannot be opened or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    // The CLI may already have installed a logger.
    let _ = pretty_env_logger::try_init_custom_env("RUST_LOG");

    let db_path = db_path_from_env();
    log::info!("Opening calculation history at {}...", db_path.display());
    let db = ecozync_history::open_db(&db_path)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = web::Data::new(AppState {
        db: Arc::from(db),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
