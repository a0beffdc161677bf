// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Default number of questions in one test draw when the client does not
/// supply a limit. Resolved at the API boundary, never inside the query.
pub const DEFAULT_TEST_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub frontend_origin: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let frontend_origin =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        Self {
            database_url,
            rust_log,
            frontend_origin,
            port,
        }
    }
}
