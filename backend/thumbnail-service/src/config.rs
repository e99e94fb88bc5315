/// Configuration management for thumbnail-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;
use thumbnail_cache::ThumbnailCacheConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8090;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cache: ThumbnailCacheConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("THUMBNAIL_SERVICE_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid THUMBNAIL_SERVICE_PORT {}: {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            app: AppConfig {
                host: lookup("THUMBNAIL_SERVICE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            cache: ThumbnailCacheConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_bind_address() {
        let vars = env(&[
            ("THUMB_BUCKET", "thumbs"),
            ("THUMBNAIL_API_URL", "http://renderer:3000/thumbnail"),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.app.bind_address(), "0.0.0.0:8090");
        assert_eq!(config.cache.thumb_bucket, "thumbs");
    }

    #[test]
    fn test_invalid_port() {
        let vars = env(&[
            ("THUMB_BUCKET", "thumbs"),
            ("THUMBNAIL_API_URL", "http://renderer:3000/thumbnail"),
            ("THUMBNAIL_SERVICE_PORT", "eighty"),
        ]);
        assert!(Config::from_lookup(|name| vars.get(name).cloned()).is_err());
    }

    #[test]
    fn test_cache_config_errors_propagate() {
        let vars = env(&[("THUMBNAIL_SERVICE_PORT", "9000")]);
        let err = Config::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains("THUMB_BUCKET"));
    }
}
