use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub port: u16,
    pub debug: bool,
    pub enable_swagger: bool,
    /// Directory served statically; the generated calendar lands here.
    pub public_dir: PathBuf,
    /// Delay after a page load settles before its text is captured.
    pub fetch_settle_ms: u64,
    pub openai_base_url: Url,
    pub openai_model: String,
    /// Not checked at startup; extraction fails on first use when unset.
    pub openai_api_key: Option<String>,
    pub smtp_host: String,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP"))
            .set_default("port", 3001)?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("public_dir", "public")?
            .set_default("fetch_settle_ms", 1000)?
            .set_default("openai_base_url", "https://api.openai.com")?
            .set_default("openai_model", "gpt-4o-2024-08-06")?
            .set_default("smtp_host", "smtp.gmail.com")?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 3001);
        assert!(!settings.debug);
        assert_eq!(settings.public_dir, PathBuf::from("public"));
        assert_eq!(settings.fetch_settle_ms, 1000);
        assert_eq!(settings.openai_model, "gpt-4o-2024-08-06");
        assert_eq!(settings.smtp_host, "smtp.gmail.com");
        assert_eq!(settings.openai_api_key, None);
        assert_eq!(settings.smtp_username, None);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("APP_PORT", "9001");
            std::env::set_var("APP_OPENAI_API_KEY", "sk-test");
        }
        let settings = Settings::from_env().unwrap();
        unsafe {
            std::env::remove_var("APP_PORT");
            std::env::remove_var("APP_OPENAI_API_KEY");
        }
        assert_eq!(settings.port, 9001);
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
    }
}
