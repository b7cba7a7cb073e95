//! Public IP lookup and connectivity testing
//!
//! Both lookups are best-effort: failures are masked with placeholder data
//! instead of surfacing as hard errors, so callers always get a well-formed
//! answer. No retry, no cancellation.

use serde::{Deserialize, Serialize};

/// Sentinel returned when the IP lookup fails
pub const UNKNOWN_IP: &str = "Unable to detect";

/// Sentinel location paired with the unknown IP
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Location string returned on success; lookups are IP-only on purpose
const PRIVACY_LOCATION: &str = "Location lookup disabled for privacy";

/// Current public IP and coarse location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInfo {
    pub ip: String,
    pub location: String,
}

impl IpInfo {
    /// The degrade-gracefully fallback
    pub fn unknown() -> Self {
        Self {
            ip: UNKNOWN_IP.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
        }
    }
}

/// Outcome of a connectivity test.
///
/// `connected` is deliberately distinct from the messaging-layer `success`:
/// a delivered request with a failed probe still reports success at the
/// envelope level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTest {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub message: String,
}

/// External endpoints used for the lookups
#[derive(Debug, Clone)]
pub struct IpEndpoints {
    /// Returns `{"ip": "..."}`
    pub ip_echo: String,
    /// Returns `{"origin": "..."}`
    pub connectivity: String,
}

impl Default for IpEndpoints {
    fn default() -> Self {
        Self {
            ip_echo: "https://api.ipify.org?format=json".to_string(),
            connectivity: "https://httpbin.org/ip".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct IpEchoBody {
    ip: String,
}

#[derive(Deserialize)]
struct ConnectivityBody {
    origin: String,
}

/// Best-effort IP lookup client
pub struct IpService {
    client: reqwest::Client,
    endpoints: IpEndpoints,
}

impl IpService {
    pub fn new(endpoints: IpEndpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &IpEndpoints {
        &self.endpoints
    }

    /// Fetch the current public IP.
    ///
    /// Any failure (network, non-2xx status, malformed body) collapses into
    /// the `unknown` sentinel rather than an error.
    pub async fn current_ip(&self) -> IpInfo {
        match self.fetch_ip().await {
            Ok(ip) => IpInfo {
                ip,
                location: PRIVACY_LOCATION.to_string(),
            },
            Err(e) => {
                tracing::info!(target = "ip", error = %e, "IP lookup failed, using fallback");
                IpInfo::unknown()
            }
        }
    }

    /// Probe the connectivity endpoint through whatever proxy is live.
    ///
    /// Distinguishes "request delivered" from "proxy actually works": the
    /// probe never errors, it reports `connected: false` with a diagnostic.
    pub async fn test_connection(&self) -> ConnectionTest {
        match self.fetch_origin().await {
            Ok(origin) => ConnectionTest {
                connected: true,
                ip: Some(origin),
                message: "Connection successful".to_string(),
            },
            Err(e) => {
                tracing::warn!(target = "ip", error = %e, "connection test failed");
                ConnectionTest {
                    connected: false,
                    ip: None,
                    message: format!("Connection test failed: {e}"),
                }
            }
        }
    }

    async fn fetch_ip(&self) -> Result<String, reqwest::Error> {
        let body: IpEchoBody = self
            .client
            .get(&self.endpoints.ip_echo)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.ip)
    }

    async fn fetch_origin(&self) -> Result<String, reqwest::Error> {
        let body: ConnectivityBody = self
            .client
            .get(&self.endpoints.connectivity)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.origin)
    }
}

impl Default for IpService {
    fn default() -> Self {
        Self::new(IpEndpoints::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_service() -> IpService {
        // Nothing listens on port 9; both lookups must fail fast and fall
        // back without propagating an error.
        IpService::new(IpEndpoints {
            ip_echo: "http://127.0.0.1:9/ip".to_string(),
            connectivity: "http://127.0.0.1:9/origin".to_string(),
        })
    }

    #[tokio::test]
    async fn test_current_ip_masks_failure_with_sentinel() {
        let info = unreachable_service().current_ip().await;
        assert_eq!(info.ip, UNKNOWN_IP);
        assert_eq!(info.location, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn test_connection_failure_keeps_diagnostic() {
        let outcome = unreachable_service().test_connection().await;
        assert!(!outcome.connected);
        assert!(outcome.ip.is_none());
        assert!(outcome.message.starts_with("Connection test failed:"));
    }

    #[test]
    fn test_ip_info_wire_shape() {
        let json = serde_json::to_value(IpInfo::unknown()).unwrap();
        assert_eq!(json["ip"], UNKNOWN_IP);
        assert_eq!(json["location"], UNKNOWN_LOCATION);
    }
}
