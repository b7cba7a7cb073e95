//! Application layer: message contract, dispatch, bus, and client flows

pub mod bus;
pub mod client;
pub mod messages;
pub mod observer;
pub mod router;

pub use bus::{serve, BusInbox, MessageBus};
pub use client::UiClient;
pub use messages::{Request, Response};
pub use observer::{PageContext, PageObserver};
pub use router::Router;
