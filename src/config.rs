use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Required secrets
    pub telegram_token: String,
    pub yandex_music_token: String,

    #[serde(default = "default_yandex_api_url")]
    pub yandex_api_url: String,

    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    #[serde(default = "default_chart_option")]
    pub chart_option: String,

    // Health endpoint is only served when a port is configured
    pub health_port: Option<u16>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_rust_log")]
    pub rust_log: String,
}

fn default_yandex_api_url() -> String {
    "https://api.music.yandex.net".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_chart_option() -> String {
    "world".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rust_log() -> String {
    "info,trackinfobot=debug".to_string()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validate()
    }

    /// A blank secret counts as missing
    fn validate(self) -> anyhow::Result<Self> {
        for (name, value) in [
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("YANDEX_MUSIC_TOKEN", &self.yandex_music_token),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("Failed to load config: {} must not be empty", name);
            }
        }

        Ok(self)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}
