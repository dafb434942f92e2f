use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Postgres DSN. Without one, notes are kept in memory.
    #[serde(default)]
    pub pg_dsn: Option<String>,
    #[serde(default = "default_session_ttl", with = "humantime_serde")]
    pub session_ttl: Duration,
    #[serde(default)]
    pub secure_cookies: bool,
}

const fn default_port() -> u16 {
    8000
}

const fn default_session_ttl() -> Duration {
    Duration::from_secs(14 * 24 * 60 * 60)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            pg_dsn: None,
            session_ttl: default_session_ttl(),
            secure_cookies: false,
        }
    }
}

fn read_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::default();

    if let Ok(port) = env::var("PORT") {
        config.port = port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?;
    }

    config.pg_dsn = env::var("PG_DSN").ok().filter(|dsn| !dsn.is_empty());

    if let Ok(ttl) = env::var("SESSION_TTL") {
        config.session_ttl = humantime_serde::re::humantime::parse_duration(&ttl)
            .map_err(|e| format!("Failed to parse SESSION_TTL: {e}"))?;
    }

    if let Ok(secure) = env::var("SECURE_COOKIES") {
        config.secure_cookies = secure
            .parse::<bool>()
            .map_err(|e| format!("Failed to parse SECURE_COOKIES: {e}"))?;
    }

    Ok(config)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return read_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return read_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return read_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env().map_err(|e| {
        format!(
            "Config file not found and environment variables are invalid. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_yaml() {
        let yaml = "port: 9000\npg_dsn: postgres://notes@localhost/notes\nsession_ttl: 2h\nsecure_cookies: true\n";

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.pg_dsn.as_deref(),
            Some("postgres://notes@localhost/notes")
        );
        assert_eq!(config.session_ttl, Duration::from_secs(2 * 60 * 60));
        assert!(config.secure_cookies);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.session_ttl, Duration::from_secs(14 * 24 * 60 * 60));
    }

    #[test]
    fn example_config_keeps_notes_in_memory() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.yaml");
        let config = read_file(path).unwrap();

        assert_eq!(config.pg_dsn, None);
        assert_eq!(config.session_ttl, Duration::from_secs(14 * 24 * 60 * 60));
    }
}
