//! Proxy controller coordinating platform configuration and persisted state
//!
//! The controller is the sole writer of both the live proxy configuration
//! and the state store (by convention, not enforced exclusion). Every state
//! change writes through to both; the platform is updated first, matching
//! the original lifecycle, so a crash in between leaves a detectable but
//! unresolved inconsistency.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::descriptor::{builtin_proxies, ProxyDescriptor};
use super::errors::ProxyError;
use super::events::{PlatformErrorEvent, ProxyStateEvent};
use super::platform::ProxyPlatform;
use super::setting::ProxySetting;
use super::state::{PersistedState, ProxyFault};
use crate::core::ip::{ConnectionTest, IpInfo, IpService};
use crate::core::store::StateStore;

/// Read-only view of the current proxy status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub is_active: bool,
    pub active_proxy: Option<ProxyDescriptor>,
    pub last_error: Option<ProxyFault>,
}

/// Central coordinator for proxy operations
pub struct ProxyController {
    platform: Arc<dyn ProxyPlatform>,
    store: Arc<dyn StateStore>,
    ip: IpService,
    events: broadcast::Sender<ProxyStateEvent>,
}

impl ProxyController {
    pub fn new(platform: Arc<dyn ProxyPlatform>, store: Arc<dyn StateStore>, ip: IpService) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            platform,
            store,
            ip,
            events,
        }
    }

    /// Subscribe to proxy state change events
    pub fn subscribe(&self) -> broadcast::Receiver<ProxyStateEvent> {
        self.events.subscribe()
    }

    /// Load persisted state, seeding the initial state on first run.
    ///
    /// On a restart with an active proxy the restored configuration is
    /// logged; nothing is re-applied automatically.
    pub fn initialize(&self) -> Result<PersistedState, ProxyError> {
        match self.store.load() {
            Ok(state) => {
                if state.proxy_active {
                    if let Some(proxy) = &state.selected_proxy {
                        tracing::info!(
                            target = "controller",
                            proxy = %proxy,
                            "restoring proxy configuration"
                        );
                    }
                }
                Ok(state)
            }
            Err(_) => {
                let state = PersistedState::initial();
                self.store
                    .save(&state)
                    .map_err(|e| ProxyError::store(e.to_string()))?;
                tracing::info!(target = "controller", "state store initialized");
                Ok(state)
            }
        }
    }

    /// Apply a proxy descriptor.
    ///
    /// Validation and platform failures leave stored state untouched. On
    /// success the descriptor is persisted, `proxyActive` reflects whether
    /// it is a non-direct proxy, and `lastConnected` is stamped.
    pub async fn set_proxy(&self, descriptor: ProxyDescriptor) -> Result<(), ProxyError> {
        let setting = ProxySetting::for_descriptor(&descriptor)?;

        self.platform.apply(&setting).await?;

        let mut state = self
            .store
            .load()
            .map_err(|e| ProxyError::store(e.to_string()))?;
        let previous_active = state.proxy_active;
        state.record_connected(descriptor);
        self.store
            .save(&state)
            .map_err(|e| ProxyError::store(e.to_string()))?;

        tracing::info!(
            target = "controller",
            active = state.proxy_active,
            setting = %setting,
            "proxy set"
        );

        let _ = self.events.send(ProxyStateEvent::new(
            previous_active,
            state.proxy_active,
            state.selected_proxy.clone(),
            "setProxy",
        ));
        Ok(())
    }

    /// Switch back to direct mode unconditionally.
    ///
    /// On success `selectedProxy` is cleared, `proxyActive` is false and
    /// `lastDisconnected` is stamped.
    pub async fn clear_proxy(&self) -> Result<(), ProxyError> {
        self.platform.apply(&ProxySetting::Direct).await?;

        let mut state = self
            .store
            .load()
            .map_err(|e| ProxyError::store(e.to_string()))?;
        let previous_active = state.proxy_active;
        state.record_disconnected();
        self.store
            .save(&state)
            .map_err(|e| ProxyError::store(e.to_string()))?;

        tracing::info!(target = "controller", "proxy cleared, direct mode active");

        let _ = self.events.send(ProxyStateEvent::new(
            previous_active,
            false,
            None,
            "clearProxy",
        ));
        Ok(())
    }

    /// Read-only status snapshot; never fails.
    ///
    /// Store read failures degrade to the default (inactive) view.
    pub fn status(&self) -> StatusSnapshot {
        let state = self.store.load().unwrap_or_else(|e| {
            tracing::warn!(target = "controller", error = %e, "status read failed, using defaults");
            PersistedState::default()
        });
        StatusSnapshot {
            is_active: state.proxy_active,
            active_proxy: state.selected_proxy,
            last_error: state.last_error,
        }
    }

    /// The static descriptor list; always succeeds
    pub fn fetch_proxies(&self) -> Vec<ProxyDescriptor> {
        builtin_proxies()
    }

    /// Best-effort public IP lookup (sentinel on failure)
    pub async fn current_ip(&self) -> IpInfo {
        self.ip.current_ip().await
    }

    /// Best-effort connectivity probe
    pub async fn test_connection(&self) -> ConnectionTest {
        self.ip.test_connection().await
    }

    /// React to a platform-level proxy error.
    ///
    /// Forces `proxyActive` off and records `lastError`. Store failures are
    /// logged and swallowed; this path runs outside any request/reply.
    pub fn handle_platform_error(&self, event: PlatformErrorEvent) {
        tracing::error!(target = "controller", message = %event.message, "platform proxy error");

        let mut state = self.store.load().unwrap_or_default();
        let previous_active = state.proxy_active;
        state.record_fault(ProxyFault {
            message: event.message,
            timestamp: event.timestamp,
        });
        if let Err(e) = self.store.save(&state) {
            tracing::warn!(target = "controller", error = %e, "failed to persist platform error");
            return;
        }

        let _ = self.events.send(ProxyStateEvent::new(
            previous_active,
            false,
            state.selected_proxy.clone(),
            "platformError",
        ));
    }
}
