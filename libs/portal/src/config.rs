use thiserror::Error;
use url::Url;

pub const API_URL_ENV: &str = "WAYFORWARD_API_URL";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const DEFAULT_API_URL: &str = "http://localhost:8087";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0}. Please check your environment.")]
    Missing(&'static str),
    #[error("{var} is not a valid URL: {message}")]
    InvalidUrl { var: &'static str, message: String },
}

/// Where the portal finds the platform API and the hosted auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_url: Url,
    pub supabase_url: Url,
    pub supabase_anon_key: String,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = get(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let supabase_url = get(SUPABASE_URL_ENV).ok_or(ConfigError::Missing(SUPABASE_URL_ENV))?;
        let supabase_anon_key =
            get(SUPABASE_ANON_KEY_ENV).ok_or(ConfigError::Missing(SUPABASE_ANON_KEY_ENV))?;

        Ok(Self {
            api_url: parse_url(API_URL_ENV, &api_url)?,
            supabase_url: parse_url(SUPABASE_URL_ENV, &supabase_url)?,
            supabase_anon_key,
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var,
        message: e.to_string(),
    })
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn api_url_has_a_default() {
        let cfg = PortalConfig::from_lookup(lookup(&[
            (SUPABASE_URL_ENV, "https://abc.supabase.co"),
            (SUPABASE_ANON_KEY_ENV, "anon"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url.as_str(), "http://localhost:8087/");
        assert_eq!(cfg.supabase_anon_key, "anon");
    }

    #[test]
    fn hosted_values_are_required() {
        let err = PortalConfig::from_lookup(lookup(&[(SUPABASE_ANON_KEY_ENV, "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(SUPABASE_URL_ENV));

        let err = PortalConfig::from_lookup(lookup(&[
            (SUPABASE_URL_ENV, "https://abc.supabase.co"),
            (SUPABASE_ANON_KEY_ENV, "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(SUPABASE_ANON_KEY_ENV));
    }

    #[test]
    fn rejects_malformed_urls() {
        let err = PortalConfig::from_lookup(lookup(&[
            (API_URL_ENV, "not a url"),
            (SUPABASE_URL_ENV, "https://abc.supabase.co"),
            (SUPABASE_ANON_KEY_ENV, "anon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: API_URL_ENV, .. }));
    }
}
