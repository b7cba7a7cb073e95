//! Platform proxy setting values and descriptor validation

use serde::{Deserialize, Serialize};

use super::descriptor::ProxyDescriptor;
use super::errors::ProxyError;

/// The configuration value applied to the platform's proxy settings.
///
/// Mirrors the two modes the controller ever applies: bypass any proxy, or
/// route everything through one explicit host/port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProxySetting {
    /// Bypass any proxy
    Direct,
    /// Route all traffic through a single explicit proxy
    FixedServer {
        scheme: String,
        host: String,
        port: u16,
    },
}

impl ProxySetting {
    /// Build the platform setting for a descriptor, validating it.
    ///
    /// Validation order matches the controller contract: a missing IP is
    /// rejected first; direct descriptors skip the port check entirely;
    /// everything else requires a non-zero port.
    pub fn for_descriptor(descriptor: &ProxyDescriptor) -> Result<Self, ProxyError> {
        if descriptor.ip.is_empty() {
            return Err(ProxyError::config("Invalid proxy configuration"));
        }

        if descriptor.is_direct() {
            return Ok(ProxySetting::Direct);
        }

        if descriptor.port == 0 {
            return Err(ProxyError::config("Invalid proxy port"));
        }

        Ok(ProxySetting::FixedServer {
            scheme: descriptor.scheme().to_string(),
            host: descriptor.ip.clone(),
            port: descriptor.port,
        })
    }

    /// Whether this setting bypasses any proxy
    pub fn is_direct(&self) -> bool {
        matches!(self, ProxySetting::Direct)
    }
}

impl std::fmt::Display for ProxySetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxySetting::Direct => write!(f, "direct"),
            ProxySetting::FixedServer { scheme, host, port } => {
                write!(f, "{scheme}://{host}:{port}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, ip: &str, port: u16) -> ProxyDescriptor {
        ProxyDescriptor {
            id: id.to_string(),
            ip: ip.to_string(),
            port,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_ip_rejected() {
        let err = ProxySetting::for_descriptor(&descriptor("demo", "", 8080)).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_direct_by_id_skips_port_check() {
        let setting = ProxySetting::for_descriptor(&descriptor("direct", "DIRECT", 0)).unwrap();
        assert!(setting.is_direct());
    }

    #[test]
    fn test_direct_by_ip_sentinel() {
        let setting = ProxySetting::for_descriptor(&descriptor("odd", "DIRECT", 0)).unwrap();
        assert!(setting.is_direct());
    }

    #[test]
    fn test_missing_port_rejected() {
        let err = ProxySetting::for_descriptor(&descriptor("demo", "127.0.0.1", 0)).unwrap_err();
        assert!(err.to_string().contains("Invalid proxy port"));
    }

    #[test]
    fn test_fixed_server_defaults_scheme() {
        let setting = ProxySetting::for_descriptor(&descriptor("demo", "127.0.0.1", 8080)).unwrap();
        assert_eq!(
            setting,
            ProxySetting::FixedServer {
                scheme: "http".to_string(),
                host: "127.0.0.1".to_string(),
                port: 8080,
            }
        );
        assert_eq!(setting.to_string(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_explicit_protocol_preserved() {
        let mut d = descriptor("demo", "10.1.1.1", 1080);
        d.protocol = Some("socks5".to_string());
        let setting = ProxySetting::for_descriptor(&d).unwrap();
        assert_eq!(setting.to_string(), "socks5://10.1.1.1:1080");
    }
}
