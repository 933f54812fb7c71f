use std::env;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "localhost";
pub const DEFAULT_BIND_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("BIND_ADDR must not be empty")]
    EmptyBindAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            bind_port: DEFAULT_BIND_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(value) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Err(ConfigError::EmptyBindAddr);
                }
                value
            }
            Err(_) => DEFAULT_BIND_ADDR.to_string(),
        };
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort)
            })
            .transpose()?
            .unwrap_or(DEFAULT_BIND_PORT);

        Ok(Self {
            bind_addr,
            bind_port,
        })
    }

    /// Host and port in the form accepted by `TcpListener::bind`, which also
    /// resolves host names such as `localhost`.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }
}
