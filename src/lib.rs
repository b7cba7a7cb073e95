//! proxy-switchboard
//!
//! A small service that lets a client pick a proxy server from a fixed list
//! (including a direct-connection entry), applies it through the platform's
//! proxy configuration, persists the resulting state across restarts, and
//! reports the current public IP for feedback.

pub mod app;
pub mod core;
pub mod logging;
