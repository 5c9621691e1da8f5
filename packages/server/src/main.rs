#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the Ecozync API server.
//!
//! Reads `BIND_ADDR`, `PORT`, and `ECOZYNC_DB_PATH` from the environment.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    ecozync_server::run_server().await
}
