//! Persisted proxy state

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::descriptor::ProxyDescriptor;

/// Recorded platform failure (`lastError` on disk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyFault {
    /// Human-readable failure message
    pub message: String,
    /// RFC 3339 timestamp of when the failure was observed
    pub timestamp: String,
}

impl ProxyFault {
    /// Record a fault observed now
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: now_rfc3339(),
        }
    }
}

/// The flat key-value state persisted across restarts.
///
/// Field names serialize to the exact stored keys: `proxyActive`,
/// `selectedProxy`, `lastError`, `lastConnected`, `lastDisconnected`,
/// `installDate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Whether a non-direct proxy is currently applied
    pub proxy_active: bool,

    /// The descriptor last applied, if any
    pub selected_proxy: Option<ProxyDescriptor>,

    /// Last platform failure, if any
    pub last_error: Option<ProxyFault>,

    /// When a proxy was last successfully applied
    pub last_connected: Option<String>,

    /// When the proxy was last cleared
    pub last_disconnected: Option<String>,

    /// When the state was first initialized
    pub install_date: Option<String>,
}

impl PersistedState {
    /// Initial state seeded on first run
    pub fn initial() -> Self {
        Self {
            install_date: Some(now_rfc3339()),
            ..Default::default()
        }
    }

    /// Record a successful proxy application.
    ///
    /// `proxy_active` is derived from the descriptor: direct descriptors
    /// never count as active.
    pub fn record_connected(&mut self, descriptor: ProxyDescriptor) {
        self.proxy_active = !descriptor.is_direct();
        self.selected_proxy = Some(descriptor);
        self.last_connected = Some(now_rfc3339());
    }

    /// Record a successful switch back to direct mode
    pub fn record_disconnected(&mut self) {
        self.proxy_active = false;
        self.selected_proxy = None;
        self.last_disconnected = Some(now_rfc3339());
    }

    /// Record an asynchronous platform failure
    pub fn record_fault(&mut self, fault: ProxyFault) {
        self.proxy_active = false;
        self.last_error = Some(fault);
    }
}

/// Current time as an RFC 3339 string (the stored timestamp format)
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
