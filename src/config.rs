use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// YouTube Data API key
    pub youtube_api_key: String,

    /// YouTube Data API base URL
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    /// Ranking oracle (OpenAI-compatible) API key
    pub oracle_api_key: String,

    /// Ranking oracle base URL
    #[serde(default = "default_oracle_api_url")]
    pub oracle_api_url: String,

    /// Model name sent with every selection request
    #[serde(default = "default_oracle_model")]
    pub oracle_model: String,

    /// Redis connection URL. Catalog responses are not cached when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_oracle_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects blank credentials so a misconfigured process fails at startup
    /// instead of on its first request.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.youtube_api_key.trim().is_empty() {
            anyhow::bail!("YOUTUBE_API_KEY is set but empty");
        }
        if self.oracle_api_key.trim().is_empty() {
            anyhow::bail!("ORACLE_API_KEY is set but empty");
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_pairs(&[
            ("YOUTUBE_API_KEY", "yt-key"),
            ("ORACLE_API_KEY", "oracle-key"),
        ])
        .unwrap();

        assert_eq!(config.youtube_api_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.oracle_api_url, "https://api.openai.com/v1");
        assert_eq!(config.oracle_model, "gpt-4o-mini");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credential_is_an_error() {
        let result = from_pairs(&[("YOUTUBE_API_KEY", "yt-key")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_credential_fails_validation() {
        let config = from_pairs(&[
            ("YOUTUBE_API_KEY", "yt-key"),
            ("ORACLE_API_KEY", "  "),
        ])
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ORACLE_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("YOUTUBE_API_KEY", "yt-key"),
            ("ORACLE_API_KEY", "oracle-key"),
            ("REDIS_URL", "redis://cache:6379"),
            ("ORACLE_MODEL", "gpt-4.1"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.oracle_model, "gpt-4.1");
        assert_eq!(config.port, 8080);
    }
}
