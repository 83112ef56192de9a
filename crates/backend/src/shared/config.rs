use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for the `limit` of list requests; larger values are capped.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_max_page_size() -> u32 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub api_token: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/jewelry.db"

[server]
port = 3000
max_page_size = 1000

[auth]
api_token = "dev-token"

[seed]
enabled = true
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Embedded default
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.auth.api_token.trim().is_empty() {
        anyhow::bail!("auth.api_token must not be empty");
    }
    if config.server.max_page_size == 0 {
        anyhow::bail!("server.max_page_size must be at least 1");
    }
    Ok(config)
}

/// Database file path; relative paths resolve against the executable directory.
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);
    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(db_path)))
        .unwrap_or_else(|| db_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/jewelry.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_page_size, 1000);
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_optional_sections_default() {
        let config = parse_config(
            r#"
            [database]
            path = "/var/lib/jewelry.db"

            [auth]
            api_token = "t"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.max_page_size, 1000);
        assert!(!config.seed.enabled);
        assert_eq!(get_database_path(&config), PathBuf::from("/var/lib/jewelry.db"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = parse_config(
            r#"
            [database]
            path = "a.db"

            [auth]
            api_token = "  "
            "#,
        );
        assert!(result.is_err());
    }
}
