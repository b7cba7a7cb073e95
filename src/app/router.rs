//! Request dispatch
//!
//! One exhaustive match per action. Validation and platform errors are
//! folded into the response envelope; nothing is thrown across the message
//! boundary.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::core::proxy::{ProxyController, ProxyError};

use super::messages::{
    IpReport, OpOutcome, PageInfoReport, PageLoadReport, ProxyList, Request, Response, TestReport,
};
use super::observer::PageObserver;

/// Dispatches requests to the controller and the page observer
pub struct Router {
    controller: Arc<ProxyController>,
    observer: Arc<PageObserver>,
}

impl Router {
    pub fn new(controller: Arc<ProxyController>, observer: Arc<PageObserver>) -> Self {
        Self {
            controller,
            observer,
        }
    }

    pub fn controller(&self) -> &Arc<ProxyController> {
        &self.controller
    }

    /// Handle one request; always produces a response
    pub async fn dispatch(&self, request: Request) -> Response {
        tracing::debug!(target = "router", action = request.action(), "dispatching");

        match request {
            Request::SetProxy { proxy } => match self.controller.set_proxy(proxy).await {
                Ok(()) => Response::Outcome(OpOutcome::ok()),
                Err(e) => {
                    tracing::warn!(target = "router", category = e.category(), error = %e, "setProxy failed");
                    Response::Outcome(OpOutcome::err(e.to_string()))
                }
            },
            Request::ClearProxy => match self.controller.clear_proxy().await {
                Ok(()) => Response::Outcome(OpOutcome::ok()),
                Err(e) => {
                    tracing::warn!(target = "router", category = e.category(), error = %e, "clearProxy failed");
                    Response::Outcome(OpOutcome::err(e.to_string()))
                }
            },
            Request::GetProxyStatus => Response::Status(self.controller.status()),
            Request::FetchProxies => Response::Proxies(ProxyList {
                success: true,
                proxies: self.controller.fetch_proxies(),
            }),
            Request::GetCurrentIp => Response::Ip(IpReport {
                success: true,
                ip_info: self.controller.current_ip().await,
            }),
            Request::TestConnection => Response::Test(TestReport {
                success: true,
                result: self.controller.test_connection().await,
            }),
            Request::CheckPageLoad => Response::PageLoad(PageLoadReport {
                success: true,
                page_info: self.observer.check_page_load(),
            }),
            Request::GetPageInfo => Response::PageInfo(PageInfoReport {
                success: true,
                page_info: self.observer.page_info(),
            }),
            Request::IpCheckDetected { url, .. } => {
                tracing::info!(target = "router", url = %url, "IP check detected");
                Response::Outcome(OpOutcome::ok())
            }
            Request::ReportNetworkError { error } => {
                tracing::warn!(
                    target = "router",
                    message = %error.message,
                    url = %error.url,
                    "network error reported"
                );
                Response::Outcome(OpOutcome::ok())
            }
        }
    }

    /// Handle a raw JSON envelope.
    ///
    /// An unrecognized `action` (or malformed payload) yields the
    /// unknown-action response instead of an error.
    pub async fn dispatch_value(&self, value: Value) -> Value {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match serde_json::from_value::<Request>(value) {
            Ok(request) => match serde_json::to_value(self.dispatch(request).await) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(target = "router", error = %e, "response serialization failed");
                    json!({ "success": false, "error": "Internal error" })
                }
            },
            Err(e) => {
                let err = ProxyError::unknown_action(action);
                tracing::warn!(target = "router", category = err.category(), error = %e, "unknown action");
                json!({ "success": false, "error": err.to_string() })
            }
        }
    }
}
