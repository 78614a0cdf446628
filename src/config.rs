use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub mediastack_api_key: String,
    pub gemini_api_key: String,
    pub news_country: String,
    pub news_language: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Both upstream API keys are required to start
        let mediastack_api_key = env::var("MEDIASTACK_API_KEY")
            .map_err(|_| AppError::ConfigError("MEDIASTACK_API_KEY is not set".to_string()))?;
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::ConfigError("GEMINI_API_KEY is not set".to_string()))?;

        // Fixed region/language for the headline feed, not request parameters
        let news_country = env::var("NEWS_COUNTRY").unwrap_or_else(|_| "in".to_string());
        let news_language = env::var("NEWS_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        Ok(Config {
            server_addr,
            mediastack_api_key,
            gemini_api_key,
            news_country,
            news_language,
        })
    }
}
