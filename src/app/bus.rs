//! In-process message bus
//!
//! Request/reply over mpsc + oneshot, the runtime messaging analog. The
//! serve loop handles one message at a time, which is the only write
//! serialization the system has; callers awaiting a reply have no timeout,
//! so a peer that never responds leaves them suspended.

use anyhow::Result;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::core::proxy::PlatformErrorEvent;

use super::messages::{Request, Response};
use super::router::Router;

enum Envelope {
    /// Typed request awaiting a typed reply
    Typed {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    /// Raw JSON envelope, including the unknown-action path
    Raw {
        value: Value,
        reply: oneshot::Sender<Value>,
    },
}

/// Sender half handed to clients
#[derive(Clone)]
pub struct MessageBus {
    request_tx: mpsc::Sender<Envelope>,
    notify_tx: mpsc::UnboundedSender<Request>,
    platform_tx: mpsc::UnboundedSender<PlatformErrorEvent>,
}

/// Receiver ends consumed by the serve loop
pub struct BusInbox {
    request_rx: mpsc::Receiver<Envelope>,
    notify_rx: mpsc::UnboundedReceiver<Request>,
    platform_rx: mpsc::UnboundedReceiver<PlatformErrorEvent>,
}

impl MessageBus {
    /// Create a bus and its inbox
    pub fn channel() -> (Self, BusInbox) {
        let (request_tx, request_rx) = mpsc::channel(32);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (platform_tx, platform_rx) = mpsc::unbounded_channel();
        (
            Self {
                request_tx,
                notify_tx,
                platform_tx,
            },
            BusInbox {
                request_rx,
                notify_rx,
                platform_rx,
            },
        )
    }

    /// Send a request and await its reply.
    ///
    /// Errors only when the serve loop is gone; a live but unresponsive
    /// peer suspends the caller indefinitely.
    pub async fn request(&self, request: Request) -> Result<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(Envelope::Typed {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("message bus closed"))?;
        reply_rx
            .await
            .map_err(|_| anyhow::anyhow!("no response from controller"))
    }

    /// Send a raw JSON envelope and await the raw reply
    pub async fn request_raw(&self, value: Value) -> Result<Value> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(Envelope::Raw {
                value,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("message bus closed"))?;
        reply_rx
            .await
            .map_err(|_| anyhow::anyhow!("no response from controller"))
    }

    /// Fire-and-forget notification sender (for the page observer)
    pub fn notifier(&self) -> mpsc::UnboundedSender<Request> {
        self.notify_tx.clone()
    }

    /// Inject a platform-level proxy error event
    pub fn report_platform_error(&self, event: PlatformErrorEvent) {
        let _ = self.platform_tx.send(event);
    }
}

/// Runs the dispatch loop until every sender is dropped
pub async fn serve(router: Router, mut inbox: BusInbox) {
    loop {
        tokio::select! {
            envelope = inbox.request_rx.recv() => match envelope {
                Some(Envelope::Typed { request, reply }) => {
                    let response = router.dispatch(request).await;
                    // Receiver may have given up waiting; that is its problem.
                    let _ = reply.send(response);
                }
                Some(Envelope::Raw { value, reply }) => {
                    let response = router.dispatch_value(value).await;
                    let _ = reply.send(response);
                }
                None => break,
            },
            notification = inbox.notify_rx.recv() => match notification {
                Some(request) => {
                    let _ = router.dispatch(request).await;
                }
                None => break,
            },
            event = inbox.platform_rx.recv() => match event {
                Some(event) => router.controller().handle_platform_error(event),
                None => break,
            },
        }
    }
    tracing::debug!(target = "bus", "serve loop stopped");
}
