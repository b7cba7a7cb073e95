//! Proxy error types for classification and handling

use std::fmt;

/// Proxy-specific error types for better error classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Invalid proxy configuration (missing IP, missing port)
    Config(String),

    /// The platform rejected the proxy configuration change
    Platform(String),

    /// Network connectivity error (best-effort external lookups)
    Network(String),

    /// State store read/write failure
    Store(String),

    /// Unrecognized message action; carries the action name for logging
    UnknownAction(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Config messages are complete user-facing sentences already.
            ProxyError::Config(msg) => write!(f, "{msg}"),
            ProxyError::Platform(msg) => write!(f, "Platform error: {msg}"),
            ProxyError::Network(msg) => write!(f, "Network error: {msg}"),
            ProxyError::Store(msg) => write!(f, "State store error: {msg}"),
            // The offending action stays out of the reply; it only shows
            // up in logs via the variant payload.
            ProxyError::UnknownAction(_) => write!(f, "Unknown action"),
        }
    }
}

impl std::error::Error for ProxyError {}

impl ProxyError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ProxyError::Config(msg.into())
    }

    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        ProxyError::Platform(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        ProxyError::Network(msg.into())
    }

    /// Create a state store error
    pub fn store(msg: impl Into<String>) -> Self {
        ProxyError::Store(msg.into())
    }

    /// Create an unknown-action error from the offending action name
    pub fn unknown_action(action: impl Into<String>) -> Self {
        ProxyError::UnknownAction(action.into())
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ProxyError::Config(_) => "config",
            ProxyError::Platform(_) => "platform",
            ProxyError::Network(_) => "network",
            ProxyError::Store(_) => "store",
            ProxyError::UnknownAction(_) => "unknown-action",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProxyError::config("Invalid proxy port");
        assert_eq!(err.to_string(), "Invalid proxy port");

        let err = ProxyError::platform("settings rejected");
        assert!(err.to_string().contains("Platform error"));

        // The action name never leaks into the message.
        let err = ProxyError::unknown_action("selfDestruct");
        assert_eq!(err.to_string(), "Unknown action");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(ProxyError::config("x").category(), "config");
        assert_eq!(ProxyError::platform("x").category(), "platform");
        assert_eq!(ProxyError::network("x").category(), "network");
        assert_eq!(ProxyError::store("x").category(), "store");
        assert_eq!(ProxyError::unknown_action("x").category(), "unknown-action");
    }
}
