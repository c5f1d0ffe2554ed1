use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = lookup("RETAILCRAFT_API_URL")
            .filter(|value| !value.trim().is_empty())
            .context("RETAILCRAFT_API_URL is required")?;
        let request_timeout = match lookup("RETAILCRAFT_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("RETAILCRAFT_HTTP_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn base_url_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("RETAILCRAFT_API_URL"));
    }

    #[test]
    fn trailing_slash_is_trimmed_and_timeout_defaults() {
        let config =
            ClientConfig::from_lookup(lookup(&[("RETAILCRAFT_API_URL", "http://shop.local/")]))
                .unwrap();
        assert_eq!(config.api_base_url, "http://shop.local");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_must_be_numeric() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RETAILCRAFT_API_URL", "http://shop.local"),
            ("RETAILCRAFT_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        assert!(
            ClientConfig::from_lookup(lookup(&[
                ("RETAILCRAFT_API_URL", "http://shop.local"),
                ("RETAILCRAFT_HTTP_TIMEOUT_SECS", "soon"),
            ]))
            .is_err()
        );
    }
}
