//! HTTP transport used by the registry, platform and license services.
//!
//! The transport reads whole response bodies before returning, so callers
//! never hold an open connection.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{ResolveError, Result};

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-success response into [`ResolveError::UpstreamUnavailable`].
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ResolveError::upstream(url, self.status, self.text()))
        }
    }
}

/// Request/response primitives.
#[async_trait]
pub trait HttpTransport: std::fmt::Debug + Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse>;
}
