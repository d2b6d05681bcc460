use anyhow::{bail, Context, Result};

const DEFAULT_NIM_ENDPOINT: &str = "https://integrate.api.nvidia.com/v1/chat/completions";
const DEFAULT_CHAT_MODEL: &str = "nvidia/nemotron-super-49b-v1_5";
const DEFAULT_VISION_MODEL: &str = "nvidia/nemotron-nano-12b-v2-vl";
const PLACEHOLDER_API_KEY: &str = "your_nvidia_api_key_here";

/// Settings for the NVIDIA NIM chat-completions API.
#[derive(Debug, Clone)]
pub struct NimConfig {
    pub api_key: String,
    pub chat_endpoint: String,
    pub vision_endpoint: String,
    pub chat_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if `NVIDIA_API_KEY` is missing or still the placeholder.
#[derive(Debug, Clone)]
pub struct Config {
    pub nim: NimConfig,
    pub port: u16,
    pub rust_log: String,
    /// Sessions are kept in memory when unset.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub pdftoppm_path: String,
    pub pdf_render_dpi: u32,
    pub max_upload_bytes: usize,
    pub frontend_dir: Option<String>,
    pub enable_debug_routes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("NVIDIA_API_KEY").unwrap_or_default();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            bail!("NVIDIA_API_KEY is required but not set. Please set it in the .env file");
        }

        let nim = NimConfig {
            api_key,
            chat_endpoint: get("NEMOTRON_SUPER_49B_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_NIM_ENDPOINT.to_string()),
            vision_endpoint: get("NEMOTRON_NANO_VL_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_NIM_ENDPOINT.to_string()),
            chat_model: get("NEMOTRON_SUPER_49B_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            vision_model: get("NEMOTRON_NANO_VL_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            timeout_secs: parse_or(&get, "NIM_TIMEOUT_SECS", 60)?,
            max_retries: parse_or(&get, "NIM_MAX_RETRIES", 3)?,
            temperature: parse_or(&get, "NIM_TEMPERATURE", 0.7)?,
            max_tokens: parse_or(&get, "NIM_MAX_TOKENS", 2048)?,
            top_p: parse_or(&get, "NIM_TOP_P", 0.9)?,
        };

        Ok(Config {
            nim,
            port: parse_or(&get, "PORT", 8000)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            redis_url: get("REDIS_URL"),
            session_ttl_secs: parse_or(&get, "SESSION_TTL_SECS", 86_400)?,
            pdftoppm_path: get("PDFTOPPM_PATH").unwrap_or_else(|| "pdftoppm".to_string()),
            pdf_render_dpi: parse_or(&get, "PDF_RENDER_DPI", 200)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            frontend_dir: get("FRONTEND_DIR"),
            enable_debug_routes: parse_or(&get, "ENABLE_DEBUG_ROUTES", false)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_api_key_set() {
        let config = Config::from_lookup(lookup(&[("NVIDIA_API_KEY", "nvapi-test")])).unwrap();
        assert_eq!(config.nim.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.nim.vision_model, DEFAULT_VISION_MODEL);
        assert_eq!(config.nim.chat_endpoint, DEFAULT_NIM_ENDPOINT);
        assert_eq!(config.nim.max_retries, 3);
        assert_eq!(config.nim.max_tokens, 2048);
        assert!((config.nim.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.port, 8000);
        assert_eq!(config.pdf_render_dpi, 200);
        assert!(config.redis_url.is_none());
        assert!(!config.enable_debug_routes);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_placeholder_api_key_is_rejected() {
        let result = Config::from_lookup(lookup(&[("NVIDIA_API_KEY", PLACEHOLDER_API_KEY)]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port_reports_variable_name() {
        let err = Config::from_lookup(lookup(&[("NVIDIA_API_KEY", "k"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("NVIDIA_API_KEY", "k"),
            ("NEMOTRON_SUPER_49B_MODEL", "custom/chat"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("ENABLE_DEBUG_ROUTES", "true"),
            ("NIM_TOP_P", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.nim.chat_model, "custom/chat");
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert!(config.enable_debug_routes);
        assert!((config.nim.top_p - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup(&[("NVIDIA_API_KEY", "k"), ("REDIS_URL", "  ")])).unwrap();
        assert!(config.redis_url.is_none());
    }
}
