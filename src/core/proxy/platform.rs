//! Platform proxy configuration binding
//!
//! The controller talks to the live proxy configuration through the
//! `ProxyPlatform` trait so it can be tested without touching real system
//! settings. `SystemProxyPlatform` applies settings to the OS: the Windows
//! registry, macOS `networksetup`, and the process environment elsewhere.

use async_trait::async_trait;

use super::errors::ProxyError;
use super::setting::ProxySetting;

/// Environment keys honored for proxy configuration
const ENV_KEYS: [&str; 6] = [
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// Live proxy configuration target.
///
/// `apply` is the single platform suspension point: callers await it and a
/// platform that never completes leaves the caller suspended (no timeout).
#[async_trait]
pub trait ProxyPlatform: Send + Sync {
    /// Apply the given setting to the live proxy configuration
    async fn apply(&self, setting: &ProxySetting) -> Result<(), ProxyError>;

    /// Platform name for logging
    fn name(&self) -> &str;
}

/// Applies proxy settings to the operating system
pub struct SystemProxyPlatform;

#[async_trait]
impl ProxyPlatform for SystemProxyPlatform {
    async fn apply(&self, setting: &ProxySetting) -> Result<(), ProxyError> {
        tracing::info!(target = "platform", setting = %setting, "applying proxy setting");

        #[cfg(target_os = "windows")]
        {
            Self::apply_windows(setting)
        }

        #[cfg(target_os = "macos")]
        {
            Self::apply_macos(setting)
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::apply_env(setting);
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "system"
    }
}

impl SystemProxyPlatform {
    /// Detect an already-configured proxy from the environment.
    ///
    /// Returns the raw proxy URL of the first non-empty key, if any.
    pub fn detect_from_env() -> Option<String> {
        for key in ENV_KEYS {
            if let Ok(value) = std::env::var(key) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// Set or clear the proxy environment of the current process
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn apply_env(setting: &ProxySetting) {
        match setting {
            ProxySetting::Direct => {
                for key in ENV_KEYS {
                    std::env::remove_var(key);
                }
                tracing::debug!(target = "platform", "proxy environment cleared");
            }
            ProxySetting::FixedServer { .. } => {
                let url = setting.to_string();
                for key in ENV_KEYS {
                    std::env::set_var(key, &url);
                }
                tracing::debug!(target = "platform", url = %url, "proxy environment set");
            }
        }
    }

    /// Write the proxy setting to the Internet Settings registry key
    #[cfg(target_os = "windows")]
    fn apply_windows(setting: &ProxySetting) -> Result<(), ProxyError> {
        use winreg::enums::HKEY_CURRENT_USER;
        use winreg::RegKey;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu
            .create_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Internet Settings")
            .map_err(|e| ProxyError::platform(e.to_string()))?;

        match setting {
            ProxySetting::Direct => {
                key.set_value("ProxyEnable", &0u32)
                    .map_err(|e| ProxyError::platform(e.to_string()))?;
            }
            ProxySetting::FixedServer { host, port, .. } => {
                key.set_value("ProxyEnable", &1u32)
                    .map_err(|e| ProxyError::platform(e.to_string()))?;
                key.set_value("ProxyServer", &format!("{host}:{port}"))
                    .map_err(|e| ProxyError::platform(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Drive `networksetup` for the primary network service
    #[cfg(target_os = "macos")]
    fn apply_macos(setting: &ProxySetting) -> Result<(), ProxyError> {
        use std::process::Command;

        let service = "Wi-Fi";
        let status = match setting {
            ProxySetting::Direct => Command::new("networksetup")
                .args(["-setwebproxystate", service, "off"])
                .status(),
            ProxySetting::FixedServer { host, port, .. } => Command::new("networksetup")
                .args(["-setwebproxy", service, host, &port.to_string()])
                .status(),
        }
        .map_err(|e| ProxyError::platform(e.to_string()))?;

        if !status.success() {
            return Err(ProxyError::platform(format!(
                "networksetup exited with {status}"
            )));
        }
        Ok(())
    }
}

/// Platform binding that accepts every setting without touching the OS.
///
/// Useful for embedding the controller where no live configuration target
/// exists (and as a safe default in demos).
pub struct NullPlatform;

#[async_trait]
impl ProxyPlatform for NullPlatform {
    async fn apply(&self, setting: &ProxySetting) -> Result<(), ProxyError> {
        tracing::debug!(target = "platform", setting = %setting, "null platform: setting accepted");
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
