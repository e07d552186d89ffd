use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::api::ApiConfig;
use crate::localization::Locale;

#[derive(Debug, Clone, Parser)]
#[command(name = "simple-audio-grabber", version, about = "Fetch video metadata and download audio from a conversion backend")]
pub struct Cli {
    /// Base URL of the conversion backend
    #[arg(long, env = "AUDIO_GRABBER_BACKEND_URL", default_value = "http://127.0.0.1:8000/")]
    pub backend_url: Url,

    /// How often download progress is polled
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// How long the progress panel stays open after a download finishes
    #[arg(long, default_value_t = 2000)]
    pub dismiss_after_ms: u64,

    #[arg(long, value_enum, default_value_t = Locale::English)]
    pub lang: Locale,

    /// tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "simple_audio_grabber=info,warn")]
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("backend URL `{0}` cannot be used as a base URL")]
    InvalidBackendUrl(Url),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub poll_interval: Duration,
    pub dismiss_after: Duration,
    pub locale: Locale,
}

impl Cli {
    pub fn into_config(self) -> Result<ClientConfig, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.backend_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url));
        }

        let mut base_url = self.backend_url;
        // keep a path prefix such as /api when joining endpoint names
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(ClientConfig {
            api: ApiConfig { base_url },
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            dismiss_after: Duration::from_millis(self.dismiss_after_ms),
            locale: self.lang,
        })
    }
}
