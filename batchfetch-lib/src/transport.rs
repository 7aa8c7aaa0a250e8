//! Network access of the fetch workers.
//!
//! This module defines the [`Transport`] trait, the seam between the
//! concurrency core and the network, and [`ReqwestTransport`], the HTTP
//! implementation used in production. [`TransportBuilder`] exposes the knobs
//! of the underlying [`reqwest::Client`].
#![allow(clippy::module_name_repetitions)]

use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use log::debug;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{ErrorKind, Result};

/// Default number of redirects followed before a request fails, 10.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
/// Default user agent, `batchfetch/<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("batchfetch/", env!("CARGO_PKG_VERSION"));

/// Performs the single network call of a fetch worker.
///
/// Implementations must be shareable between tasks; one instance serves all
/// workers of a batch. A transport reports transport-level failures through
/// its `Error` type only. Anything the remote end answered with (including
/// non-2xx statuses) is a `Response`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// What a successful fetch hands to the consumer
    type Response: Send + 'static;
    /// What a failed fetch reports
    type Error: Display + Send + 'static;

    /// Fetch a single target
    async fn fetch(&self, target: &Url) -> std::result::Result<Self::Response, Self::Error>;
}

/// Builder for [`ReqwestTransport`].
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(default, setter(into)))]
pub struct TransportBuilder {
    /// User-agent sent with every request.
    #[builder(default_code = "String::from(DEFAULT_USER_AGENT)")]
    user_agent: String,
    /// Maximum number of redirects to follow per request.
    #[builder(default = DEFAULT_MAX_REDIRECTS)]
    max_redirects: usize,
    /// Response timeout per request.
    ///
    /// `None` keeps reqwest's default, which is to wait indefinitely.
    timeout: Option<Duration>,
}

impl Default for TransportBuilder {
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TransportBuilder {
    /// Instantiates a [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::BuildRequestClient`] if the user agent is not a
    /// valid header value or the TLS backend cannot be initialized.
    pub fn transport(self) -> Result<ReqwestTransport> {
        let builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .user_agent(self.user_agent)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects));

        let client = (match self.timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        })
        .build()
        .map_err(ErrorKind::BuildRequestClient)?;

        Ok(ReqwestTransport::new(client))
    }
}

/// HTTP transport issuing a plain `GET` per target.
///
/// The response is returned with its body unread. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing reqwest client
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = reqwest::Response;
    type Error = ErrorKind;

    async fn fetch(&self, target: &Url) -> Result<reqwest::Response> {
        debug!("GET {target}");
        match self.client.get(target.clone()).send().await {
            Ok(response) => {
                debug!("{target} answered {}", response.status());
                Ok(response)
            }
            Err(e) => {
                debug!("GET {target} failed: {e}");
                Err(ErrorKind::NetworkRequest(e))
            }
        }
    }
}
