use anyhow::{bail, Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://127.0.0.1:5173,http://127.0.0.1:5174";

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selects the external model scorer; `false` uses the deterministic mock.
    pub use_llm_scoring: bool,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Per-document character budget applied before text is sent to the model.
    pub max_chars_per_cv: usize,
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            use_llm_scoring: match var("USE_LLM_SCORING") {
                Some(raw) => parse_bool(&raw)
                    .with_context(|| format!("USE_LLM_SCORING has invalid value '{raw}'"))?,
                None => true,
            },
            openai_api_key: var("OPENAI_API_KEY").map(|k| k.trim().to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            max_chars_per_cv: parse_positive(
                "MAX_CHARS_PER_CV",
                &var("MAX_CHARS_PER_CV").unwrap_or_else(|| "20000".to_string()),
            )?,
            max_upload_bytes: parse_positive(
                "MAX_UPLOAD_BYTES",
                &var("MAX_UPLOAD_BYTES").unwrap_or_else(|| (25 * 1024 * 1024).to_string()),
            )?,
            allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            port: var("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize> {
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer, got '{raw}'"))?;
    if value == 0 {
        bail!("{key} must be a positive integer, got 0");
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert!(config.use_llm_scoring);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.max_chars_per_cv, 20_000);
        assert_eq!(config.port, 8000);
        assert_eq!(config.allowed_origins.len(), 4);
    }

    #[test]
    fn test_mock_scoring_switch() {
        let config = config_from(&[("USE_LLM_SCORING", "false")]).unwrap();
        assert!(!config.use_llm_scoring);

        let config = config_from(&[("USE_LLM_SCORING", "ON")]).unwrap();
        assert!(config.use_llm_scoring);
    }

    #[test]
    fn test_invalid_switch_is_rejected() {
        assert!(config_from(&[("USE_LLM_SCORING", "maybe")]).is_err());
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = config_from(&[("OPENAI_BASE_URL", "http://localhost:11434/v1/")]).unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_origins_split_on_commas() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://a.example, https://b.example,,",
        )])
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_zero_char_budget_is_rejected() {
        let err = config_from(&[("MAX_CHARS_PER_CV", "0")]).unwrap_err();
        assert!(err.to_string().contains("MAX_CHARS_PER_CV"));
    }

    #[test]
    fn test_zero_upload_limit_is_rejected() {
        assert!(config_from(&[("MAX_UPLOAD_BYTES", "0")]).is_err());
    }

    #[test]
    fn test_numeric_limits_are_parsed() {
        let config = config_from(&[("MAX_CHARS_PER_CV", " 500 "), ("MAX_UPLOAD_BYTES", "2048")])
            .unwrap();
        assert_eq!(config.max_chars_per_cv, 500);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn test_negative_char_budget_is_rejected() {
        assert!(config_from(&[("MAX_CHARS_PER_CV", "-5")]).is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
    }
}
