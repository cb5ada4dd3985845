use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite://comments.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";
const DEFAULT_BASE_PATH: &str = "/api/comments";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid socket address: {value}")]
    InvalidAddress { name: &'static str, value: String },
    #[error("{name} must be a positive integer, got {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must start with '/', got {value}")]
    InvalidBasePath { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: SocketAddr,
    /// Mount point of the comment routes; empty means the root.
    pub base_path: String,
    pub max_connections: u32,
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let raw_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = raw_address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                name: "BIND_ADDRESS",
                value: raw_address.clone(),
            })?;

        let raw_base_path =
            lookup("COMMENTS_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        if !raw_base_path.starts_with('/') {
            return Err(ConfigError::InvalidBasePath {
                name: "COMMENTS_BASE_PATH",
                value: raw_base_path,
            });
        }
        let base_path = raw_base_path.trim_end_matches('/').to_string();

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
        };

        Ok(Settings {
            database_url,
            bind_address,
            base_path,
            max_connections,
        })
    }
}
