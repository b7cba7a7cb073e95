//! Proxy event structures
//!
//! State change events fan out to interested observers over a broadcast
//! channel; platform error events arrive from the outside and force the
//! controller to mark the proxy inactive.

use serde::{Deserialize, Serialize};

use super::descriptor::ProxyDescriptor;
use super::state::now_rfc3339;

/// Proxy state change event, emitted on every successful set/clear
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStateEvent {
    /// Whether a proxy was active before the change
    pub previous_active: bool,

    /// Whether a proxy is active after the change
    pub current_active: bool,

    /// The descriptor now applied, if any
    pub proxy: Option<ProxyDescriptor>,

    /// What triggered the change
    pub reason: String,

    /// RFC 3339 timestamp of the change
    pub timestamp: String,
}

impl ProxyStateEvent {
    pub fn new(
        previous_active: bool,
        current_active: bool,
        proxy: Option<ProxyDescriptor>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            previous_active,
            current_active,
            proxy,
            reason: reason.into(),
            timestamp: now_rfc3339(),
        }
    }
}

/// Asynchronous platform-level proxy failure, independent of user action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformErrorEvent {
    /// Platform-reported error message
    pub message: String,

    /// RFC 3339 timestamp of the failure
    pub timestamp: String,
}

impl PlatformErrorEvent {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: now_rfc3339(),
        }
    }
}
