use serde::{Deserialize, Serialize};

/// HTTP host configuration, read from `modules.api_ingress`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Listen address; falls back to `server.host:server.port` when unset.
    #[serde(default)]
    pub bind_addr: Option<String>,
    /// Serve `/openapi.json` and `/docs`.
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            enable_docs: true,
            cors_enabled: false,
            request_timeout_sec: default_request_timeout_sec(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ApiIngressConfig {
    /// Parse the module section; a missing section means defaults.
    pub fn from_section(section: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match section {
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| anyhow::anyhow!("invalid api_ingress config: {e}")),
            None => Ok(Self::default()),
        }
    }

    /// Effective listen address.
    pub fn resolve_bind_addr(&self, host: &str, port: u16) -> String {
        match &self.bind_addr {
            Some(addr) if !addr.trim().is_empty() => addr.trim().to_string(),
            _ => format!("{host}:{port}"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_sec() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_uses_defaults() {
        let cfg = ApiIngressConfig::from_section(None).unwrap();
        assert!(cfg.bind_addr.is_none());
        assert!(cfg.enable_docs);
        assert!(!cfg.cors_enabled);
        assert_eq!(cfg.request_timeout_sec, 30);
        assert_eq!(cfg.body_limit_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn bind_addr_overrides_server_host_port() {
        let section = serde_json::json!({ "bind_addr": "0.0.0.0:9000", "cors_enabled": true });
        let cfg = ApiIngressConfig::from_section(Some(&section)).unwrap();
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.resolve_bind_addr("127.0.0.1", 8087), "0.0.0.0:9000");

        let cfg = ApiIngressConfig::default();
        assert_eq!(cfg.resolve_bind_addr("127.0.0.1", 8087), "127.0.0.1:8087");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let section = serde_json::json!({ "bind": "0.0.0.0:9000" });
        assert!(ApiIngressConfig::from_section(Some(&section)).is_err());
    }
}
