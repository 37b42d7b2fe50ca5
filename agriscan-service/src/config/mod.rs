use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "qwen/qwen2.5-vl-32b-instruct:free";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "https://agri-scan-api.vercel.app",
    "http://localhost",
    "http://localhost:3000",
    "https://agri-scan-ai.vercel.app",
];

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub openrouter: OpenRouterConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Bearer credential; an empty value is passed through and rejected upstream.
    pub api_key: Secret<String>,
    pub api_base: String,
    pub model: String,
    /// `0` disables the outbound timeout.
    pub timeout_secs: u64,
}

impl OpenRouterConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Ok(Self::from_lookup(common, |key| env::var(key).ok()))
    }

    /// Builds the gateway settings from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        GatewayConfig {
            common,
            openrouter: OpenRouterConfig {
                api_key: Secret::new(get("OPENROUTER_API_KEY", "")),
                api_base: get("OPENROUTER_API_BASE", DEFAULT_API_BASE),
                model: get("OPENROUTER_MODEL", DEFAULT_MODEL),
                timeout_secs: lookup("OPENROUTER_TIMEOUT_SECS")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            cors: CorsConfig { allowed_origins },
            upload: UploadConfig {
                max_bytes: lookup("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
