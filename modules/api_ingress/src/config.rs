use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Origins the web portal is served from.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://the-way-forward.quest",
    "https://the-way-forward.onrender.com",
    "http://localhost:8080",
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:8080",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    pub enable_docs: bool,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_string(),
            enable_docs: true,
            cors_enabled: true,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({
            "bind_addr": "0.0.0.0:9000",
            "request_timeout": "5s"
        }))
        .unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert!(cfg.enable_docs);
        assert_eq!(cfg.cors_origins.len(), DEFAULT_CORS_ORIGINS.len());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<ApiIngressConfig, _> =
            serde_json::from_value(serde_json::json!({ "bind": "x" }));
        assert!(res.is_err());
    }
}
