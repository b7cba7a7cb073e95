//! Proxy subsystem
//!
//! This module provides:
//! - Proxy descriptors and the builtin server list
//! - Descriptor validation into platform settings
//! - Persisted proxy state and its lifecycle
//! - The platform configuration seam
//! - The controller coordinating all of the above

pub mod controller;
pub mod descriptor;
pub mod errors;
pub mod events;
pub mod platform;
pub mod setting;
pub mod state;

pub use controller::{ProxyController, StatusSnapshot};
pub use descriptor::{builtin_proxies, ProxyDescriptor, DIRECT_ID, DIRECT_IP};
pub use errors::ProxyError;
pub use events::{PlatformErrorEvent, ProxyStateEvent};
pub use platform::{NullPlatform, ProxyPlatform, SystemProxyPlatform};
pub use setting::ProxySetting;
pub use state::{PersistedState, ProxyFault};
