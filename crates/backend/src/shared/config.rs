use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 5000

[upstream]
base_url = "https://api.veeqo.com"
api_key = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `INVENTORY_BASE_URL` and `INVENTORY_API_KEY` override the upstream
/// section so credentials don't have to live on disk.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;

    if let Ok(base_url) = std::env::var("INVENTORY_BASE_URL") {
        config.upstream.base_url = base_url;
    }
    if let Ok(api_key) = std::env::var("INVENTORY_API_KEY") {
        config.upstream.api_key = api_key;
    }

    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upstream.base_url, "https://api.veeqo.com");
        assert!(config.upstream.api_key.is_empty());
    }
}
