//! Passive page observer
//!
//! The observer answers two read-only queries about the context it watches
//! and opportunistically flags outbound requests to known IP-lookup hosts,
//! forwarding fire-and-forget notifications. It never touches proxy state
//! and every failure path is silent; this is best-effort instrumentation.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::proxy::state::now_rfc3339;

use super::messages::{NetworkErrorReport, Request};

/// Hosts recognized as IP-lookup services
const IP_LOOKUP_HOSTS: [&str; 4] = ["ipify", "ip-api", "httpbin", "whatismyip"];

/// The context being observed (a browsing session, a CLI session, ...)
#[derive(Debug, Clone)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub user_agent: String,
}

impl PageContext {
    /// Context describing the local client session
    pub fn for_session() -> Self {
        Self {
            url: "cli://proxy-switchboard/session".to_string(),
            title: "proxy-switchboard session".to_string(),
            user_agent: concat!("proxy-switchboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `checkPageLoad` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoadInfo {
    pub url: String,
    pub title: String,
    /// Milliseconds since the context was opened (`loadTime` on the wire)
    #[serde(rename = "loadTime")]
    pub load_time_ms: u64,
    pub timestamp: String,
}

/// `getPageInfo` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    pub domain: String,
    pub protocol: String,
    pub user_agent: String,
    pub timestamp: String,
}

/// Check whether a URL targets a known IP-lookup service
pub fn is_ip_lookup_url(url: &str) -> bool {
    IP_LOOKUP_HOSTS.iter().any(|host| url.contains(host))
}

/// Passive observer of one context
pub struct PageObserver {
    ctx: PageContext,
    opened_at: Instant,
    notify: Option<mpsc::UnboundedSender<Request>>,
}

impl PageObserver {
    /// Observer with a notification channel back to the controller
    pub fn new(ctx: PageContext, notify: Option<mpsc::UnboundedSender<Request>>) -> Self {
        Self {
            ctx,
            opened_at: Instant::now(),
            notify,
        }
    }

    /// Observer without any notification wiring (queries only)
    pub fn detached(ctx: PageContext) -> Self {
        Self::new(ctx, None)
    }

    /// Answer `checkPageLoad`
    pub fn check_page_load(&self) -> PageLoadInfo {
        PageLoadInfo {
            url: self.ctx.url.clone(),
            title: self.ctx.title.clone(),
            load_time_ms: self.opened_at.elapsed().as_millis() as u64,
            timestamp: now_rfc3339(),
        }
    }

    /// Answer `getPageInfo`
    pub fn page_info(&self) -> PageMetadata {
        let (domain, protocol) = match url::Url::parse(&self.ctx.url) {
            Ok(parsed) => (
                parsed.host_str().unwrap_or_default().to_string(),
                parsed.scheme().to_string(),
            ),
            Err(_) => (String::new(), String::new()),
        };
        PageMetadata {
            url: self.ctx.url.clone(),
            title: self.ctx.title.clone(),
            domain,
            protocol,
            user_agent: self.ctx.user_agent.clone(),
            timestamp: now_rfc3339(),
        }
    }

    /// Inspect an outbound request URL; forward a notification when it
    /// targets a known IP-lookup host. Send failures are swallowed.
    pub fn observe_request(&self, request_url: &str) {
        if !is_ip_lookup_url(request_url) {
            return;
        }
        tracing::debug!(target = "observer", url = %request_url, "IP detection request observed");
        if let Some(notify) = &self.notify {
            let _ = notify.send(Request::IpCheckDetected {
                url: request_url.to_string(),
                timestamp: now_rfc3339(),
            });
        }
    }

    /// Forward a network error notification, best-effort
    pub fn report_network_error(&self, message: impl Into<String>) {
        if let Some(notify) = &self.notify {
            let _ = notify.send(Request::ReportNetworkError {
                error: NetworkErrorReport {
                    message: message.into(),
                    url: self.ctx.url.clone(),
                    timestamp: now_rfc3339(),
                },
            });
        }
    }
}
