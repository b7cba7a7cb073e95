//! Message contract between clients and the proxy controller
//!
//! Requests are a tagged union keyed by `action`, so every action gets a
//! compile-time checked handler arm instead of string comparison. The wire
//! names are preserved exactly; an envelope with an unrecognized action
//! fails deserialization and is answered with the unknown-action response.

use serde::{Deserialize, Serialize};

use crate::core::ip::{ConnectionTest, IpInfo};
use crate::core::proxy::{ProxyDescriptor, StatusSnapshot};

use super::observer::{PageLoadInfo, PageMetadata};

/// A network error observed by the page observer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkErrorReport {
    pub message: String,
    pub url: String,
    pub timestamp: String,
}

/// Request envelope, tagged by `action`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "setProxy")]
    SetProxy {
        /// Missing payloads become an empty descriptor; validation rejects
        /// it as an invalid configuration, not an unknown action.
        #[serde(default)]
        proxy: ProxyDescriptor,
    },

    #[serde(rename = "clearProxy")]
    ClearProxy,

    #[serde(rename = "getProxyStatus")]
    GetProxyStatus,

    #[serde(rename = "fetchProxies")]
    FetchProxies,

    #[serde(rename = "getCurrentIP")]
    GetCurrentIp,

    #[serde(rename = "testConnection")]
    TestConnection,

    /// Page-observer query: did the page load, and how fast
    #[serde(rename = "checkPageLoad")]
    CheckPageLoad,

    /// Page-observer query: full page metadata
    #[serde(rename = "getPageInfo")]
    GetPageInfo,

    /// Fire-and-forget: an outbound call to a known IP-lookup host
    #[serde(rename = "ipCheckDetected")]
    IpCheckDetected { url: String, timestamp: String },

    /// Fire-and-forget: a network error observed on the page
    #[serde(rename = "reportNetworkError")]
    ReportNetworkError { error: NetworkErrorReport },
}

impl Request {
    /// The wire action name, for logging
    pub fn action(&self) -> &'static str {
        match self {
            Request::SetProxy { .. } => "setProxy",
            Request::ClearProxy => "clearProxy",
            Request::GetProxyStatus => "getProxyStatus",
            Request::FetchProxies => "fetchProxies",
            Request::GetCurrentIp => "getCurrentIP",
            Request::TestConnection => "testConnection",
            Request::CheckPageLoad => "checkPageLoad",
            Request::GetPageInfo => "getPageInfo",
            Request::IpCheckDetected { .. } => "ipCheckDetected",
            Request::ReportNetworkError { .. } => "reportNetworkError",
        }
    }
}

/// Plain `{success, error?}` outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// `fetchProxies` reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyList {
    pub success: bool,
    pub proxies: Vec<ProxyDescriptor>,
}

/// `getCurrentIP` reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpReport {
    pub success: bool,
    pub ip_info: IpInfo,
}

/// `testConnection` reply.
///
/// `success` means the request was delivered and handled; `connected`
/// (inside the flattened test result) means the probe actually worked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub success: bool,
    #[serde(flatten)]
    pub result: ConnectionTest,
}

/// `checkPageLoad` reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoadReport {
    pub success: bool,
    pub page_info: PageLoadInfo,
}

/// `getPageInfo` reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoReport {
    pub success: bool,
    pub page_info: PageMetadata,
}

/// Response envelope; the variant matches the request action
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Outcome(OpOutcome),
    Status(StatusSnapshot),
    Proxies(ProxyList),
    Ip(IpReport),
    Test(TestReport),
    PageLoad(PageLoadReport),
    PageInfo(PageInfoReport),
}
