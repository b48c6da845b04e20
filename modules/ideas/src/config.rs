use serde::{Deserialize, Serialize};

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_ENV: &str = "SUPABASE_KEY";

/// Storage backend for ideas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Postgrest,
}

/// Configuration for the ideas module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdeasConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default)]
    pub backend: Backend,
    /// Falls back to `SUPABASE_URL`.
    #[serde(default)]
    pub postgrest_url: Option<String>,
    /// Falls back to `SUPABASE_KEY`.
    #[serde(default)]
    pub postgrest_key: Option<String>,
}

impl Default for IdeasConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            backend: Backend::default(),
            postgrest_url: None,
            postgrest_key: None,
        }
    }
}

impl IdeasConfig {
    /// PostgREST url and key, from config or the Supabase environment variables.
    pub fn postgrest_credentials(&self) -> anyhow::Result<(String, String)> {
        let url = resolve(&self.postgrest_url, SUPABASE_URL_ENV)?;
        let key = resolve(&self.postgrest_key, SUPABASE_KEY_ENV)?;
        Ok((url, key))
    }
}

fn resolve(configured: &Option<String>, env: &str) -> anyhow::Result<String> {
    configured
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| std::env::var(env).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| anyhow::anyhow!("postgrest backend needs {env} (or the ideas config value)"))
}

fn default_page_size() -> u32 {
    100
}

fn default_max_page_size() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_api_limits() {
        let cfg: IdeasConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.default_page_size, 100);
        assert_eq!(cfg.max_page_size, 100);
        assert_eq!(cfg.backend, Backend::Memory);
    }

    #[test]
    fn configured_credentials_win() {
        let cfg: IdeasConfig = serde_json::from_value(serde_json::json!({
            "backend": "postgrest",
            "postgrest_url": "https://demo.supabase.co",
            "postgrest_key": "k"
        }))
        .unwrap();
        assert_eq!(cfg.backend, Backend::Postgrest);
        let (url, key) = cfg.postgrest_credentials().unwrap();
        assert_eq!(url, "https://demo.supabase.co");
        assert_eq!(key, "k");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<IdeasConfig, _> =
            serde_json::from_value(serde_json::json!({"page_size": 5}));
        assert!(res.is_err());
    }
}
