use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "3001")?,
            data_file: env::var_os("PHONEBOOK_DATA_FILE").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_joins_host_and_port() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_file: None,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
    }

    #[test]
    fn test_try_load_falls_back_to_default() {
        let port: u16 = try_load("PHONEBOOK_TEST_UNSET_PORT", "4242").unwrap();
        assert_eq!(port, 4242);
    }

    #[test]
    fn test_try_load_rejects_invalid_default() {
        let port: Result<u16> = try_load("PHONEBOOK_TEST_UNSET_PORT", "not-a-port");
        assert!(port.is_err());
    }
}
