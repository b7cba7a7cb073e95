//! Proxy descriptor types and the builtin server list

use serde::{Deserialize, Serialize};

/// Sentinel IP marking a descriptor as "no proxy"
pub const DIRECT_IP: &str = "DIRECT";

/// Descriptor id of the direct-connection entry
pub const DIRECT_ID: &str = "direct";

/// A proxy server's connection parameters plus metadata.
///
/// Serialized with camelCase keys to preserve the wire format. All fields
/// default so that a partial descriptor still deserializes; validation
/// happens when the descriptor is turned into a platform setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyDescriptor {
    /// Stable identifier ("direct" denotes no proxying)
    pub id: String,

    /// Proxy host (IP or hostname; "DIRECT" denotes no proxying)
    pub ip: String,

    /// Proxy port (0 means unset)
    pub port: u16,

    /// Proxy protocol scheme; defaults to "http" when applied
    pub protocol: Option<String>,

    /// Display country / description
    pub country: String,

    /// Anonymity level ("none", "transparent", "anonymous", "elite")
    pub anonymity: String,
}

impl Default for ProxyDescriptor {
    fn default() -> Self {
        Self {
            id: String::new(),
            ip: String::new(),
            port: 0,
            protocol: None,
            country: String::new(),
            anonymity: String::new(),
        }
    }
}

impl ProxyDescriptor {
    /// Check whether this descriptor denotes a direct connection (no proxy)
    pub fn is_direct(&self) -> bool {
        self.id == DIRECT_ID || self.ip == DIRECT_IP
    }

    /// Scheme to use when building a platform setting
    pub fn scheme(&self) -> &str {
        self.protocol.as_deref().unwrap_or("http")
    }
}

impl std::fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_direct() {
            write!(f, "{} (direct)", self.id)
        } else {
            write!(f, "{} ({}://{}:{})", self.id, self.scheme(), self.ip, self.port)
        }
    }
}

/// The static descriptor list offered to clients.
///
/// Not persisted; the same set is returned on every call.
pub fn builtin_proxies() -> Vec<ProxyDescriptor> {
    vec![
        ProxyDescriptor {
            id: DIRECT_ID.to_string(),
            ip: DIRECT_IP.to_string(),
            port: 0,
            protocol: Some("direct".to_string()),
            country: "Direct Connection (No Proxy)".to_string(),
            anonymity: "none".to_string(),
        },
        ProxyDescriptor {
            id: "demo-1".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 8080,
            protocol: Some("http".to_string()),
            country: "Local Test Server".to_string(),
            anonymity: "transparent".to_string(),
        },
        ProxyDescriptor {
            id: "demo-2".to_string(),
            ip: "proxy.example.com".to_string(),
            port: 3128,
            protocol: Some("http".to_string()),
            country: "Demo Proxy Server".to_string(),
            anonymity: "anonymous".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_detection() {
        let by_id = ProxyDescriptor {
            id: "direct".to_string(),
            ip: "1.2.3.4".to_string(),
            ..Default::default()
        };
        assert!(by_id.is_direct());

        let by_ip = ProxyDescriptor {
            id: "whatever".to_string(),
            ip: "DIRECT".to_string(),
            ..Default::default()
        };
        assert!(by_ip.is_direct());

        let regular = ProxyDescriptor {
            id: "demo-1".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert!(!regular.is_direct());
    }

    #[test]
    fn test_builtin_list_is_fixed() {
        let first = builtin_proxies();
        let second = builtin_proxies();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first[0].is_direct());
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let d = ProxyDescriptor {
            id: "demo".to_string(),
            ip: "10.0.0.1".to_string(),
            port: 3128,
            protocol: None,
            ..Default::default()
        };
        assert_eq!(d.scheme(), "http");
    }

    #[test]
    fn test_partial_descriptor_deserializes() {
        // Missing ip/port must not fail deserialization; validation rejects
        // them later when a setting is built.
        let d: ProxyDescriptor = serde_json::from_str(r#"{"id":"demo-1"}"#).unwrap();
        assert_eq!(d.id, "demo-1");
        assert!(d.ip.is_empty());
        assert_eq!(d.port, 0);
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let d = builtin_proxies().remove(1);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["id"], "demo-1");
        assert_eq!(json["ip"], "127.0.0.1");
        assert_eq!(json["port"], 8080);
        assert_eq!(json["anonymity"], "transparent");
    }
}
