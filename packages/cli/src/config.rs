// ABOUTME: Server configuration from environment variables
// ABOUTME: Port, CORS origin, database path, JWT secret, Gemini key

use std::env;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("CANOPY_JWT_SECRET must be set")]
    MissingJwtSecret,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_path: String,
    pub jwt_secret: String,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "canopy.db".to_string());

        let jwt_secret = env::var("CANOPY_JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;

        let gemini_api_key = env::var("GEMINI_API_KEY").ok();

        Ok(Config {
            port,
            cors_origin,
            database_path,
            jwt_secret,
            gemini_api_key,
        })
    }
}
