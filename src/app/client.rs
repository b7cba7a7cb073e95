//! UI client flows
//!
//! Thin wrapper over the message bus: loads the list, connects and
//! disconnects, and polls the public IP after a fixed delay so the display
//! catches up with the platform's networking stack. The delay is UX, not a
//! correctness mechanism.

use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::sleep;

use crate::core::ip::{ConnectionTest, IpInfo};
use crate::core::proxy::{ProxyDescriptor, StatusSnapshot};

use super::bus::MessageBus;
use super::messages::{Request, Response};

/// IP refresh delay after connecting
pub const CONNECT_IP_REFRESH_DELAY: Duration = Duration::from_millis(1500);

/// IP refresh delay after disconnecting
pub const DISCONNECT_IP_REFRESH_DELAY: Duration = Duration::from_millis(2000);

/// Outcome of a connect/disconnect flow
#[derive(Debug, Clone)]
pub struct ConnectReport {
    /// Human-readable feedback for the selected descriptor
    pub feedback: String,
    /// Public IP observed after the propagation delay
    pub ip: IpInfo,
}

/// Human-readable feedback per descriptor category.
///
/// Purely presentational branching over the id: direct, system proxy, PAC
/// demo, or a generic proxy server.
pub fn connection_feedback(proxy: &ProxyDescriptor) -> String {
    if proxy.is_direct() {
        "Direct connection active - browsing normally without proxy".to_string()
    } else if proxy.id == "system" {
        "Using system proxy settings - check your OS network configuration".to_string()
    } else if proxy.id == "pac-demo" {
        "PAC script demo active - demonstrates proxy auto-configuration".to_string()
    } else {
        "Proxy server connected - IP should be masked".to_string()
    }
}

/// Static list shown when the controller cannot be reached
pub fn fallback_proxies() -> Vec<ProxyDescriptor> {
    let entry = |id: &str, ip: &str, port: u16, country: &str, anonymity: &str| ProxyDescriptor {
        id: id.to_string(),
        ip: ip.to_string(),
        port,
        protocol: Some("http".to_string()),
        country: country.to_string(),
        anonymity: anonymity.to_string(),
    };
    vec![
        entry("fallback-1", "142.93.207.210", 3128, "United States", "elite"),
        entry("fallback-2", "167.99.92.12", 8080, "United Kingdom", "anonymous"),
        entry("fallback-3", "159.89.230.23", 3128, "Canada", "elite"),
        entry("fallback-4", "178.62.92.63", 8080, "Germany", "anonymous"),
        entry("fallback-5", "146.190.173.158", 3128, "France", "elite"),
    ]
}

/// Client-side view of the proxy controller
pub struct UiClient {
    bus: MessageBus,
}

impl UiClient {
    pub fn new(bus: MessageBus) -> Self {
        Self { bus }
    }

    /// Load the proxy list, falling back to the static list on any failure
    pub async fn proxy_list(&self) -> Vec<ProxyDescriptor> {
        match self.bus.request(Request::FetchProxies).await {
            Ok(Response::Proxies(list)) if !list.proxies.is_empty() => list.proxies,
            _ => {
                tracing::warn!(target = "client", "proxy list unavailable, using fallback");
                fallback_proxies()
            }
        }
    }

    /// Current status, degraded to the inactive default when unreachable
    pub async fn status(&self) -> StatusSnapshot {
        match self.bus.request(Request::GetProxyStatus).await {
            Ok(Response::Status(status)) => status,
            _ => StatusSnapshot {
                is_active: false,
                active_proxy: None,
                last_error: None,
            },
        }
    }

    /// Connect to the descriptor with the given id.
    ///
    /// Waits the fixed propagation delay, then refreshes the public IP.
    pub async fn connect(&self, id: &str) -> Result<ConnectReport> {
        let proxies = self.proxy_list().await;
        let Some(proxy) = proxies.into_iter().find(|p| p.id == id) else {
            bail!("unknown proxy id: {id}");
        };
        let feedback = connection_feedback(&proxy);

        match self.bus.request(Request::SetProxy { proxy }).await? {
            Response::Outcome(outcome) if outcome.success => {}
            Response::Outcome(outcome) => {
                bail!(outcome.error.unwrap_or_else(|| "Failed to set proxy".to_string()))
            }
            _ => bail!("unexpected response to setProxy"),
        }

        sleep(CONNECT_IP_REFRESH_DELAY).await;
        Ok(ConnectReport {
            feedback,
            ip: self.current_ip().await,
        })
    }

    /// Disconnect, wait the propagation delay, refresh the public IP
    pub async fn disconnect(&self) -> Result<ConnectReport> {
        match self.bus.request(Request::ClearProxy).await? {
            Response::Outcome(outcome) if outcome.success => {}
            Response::Outcome(outcome) => {
                bail!(outcome
                    .error
                    .unwrap_or_else(|| "Failed to clear proxy".to_string()))
            }
            _ => bail!("unexpected response to clearProxy"),
        }

        sleep(DISCONNECT_IP_REFRESH_DELAY).await;
        Ok(ConnectReport {
            feedback: "Disconnected - direct connection restored".to_string(),
            ip: self.current_ip().await,
        })
    }

    /// Current public IP (sentinel values on failure)
    pub async fn current_ip(&self) -> IpInfo {
        match self.bus.request(Request::GetCurrentIp).await {
            Ok(Response::Ip(report)) => report.ip_info,
            _ => IpInfo::unknown(),
        }
    }

    /// Run the connectivity test
    pub async fn test_connection(&self) -> ConnectionTest {
        match self.bus.request(Request::TestConnection).await {
            Ok(Response::Test(report)) => report.result,
            _ => ConnectionTest {
                connected: false,
                ip: None,
                message: "Connection test unavailable".to_string(),
            },
        }
    }
}
