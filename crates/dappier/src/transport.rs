// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP transport used by [`DappierClient`](crate::DappierClient).
//!
//! The client never talks to `reqwest` directly; it hands a fully built
//! [`TransportRequest`] to an [`HttpTransport`]. Tests substitute their own
//! implementation to observe requests without touching the network.

use std::time::Duration;

use async_trait::async_trait;
use dappier_common_secret::SecretString;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{error, trace};

use crate::error::{DappierError, Result};

/// Request timeout applied by [`ReqwestTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A JSON `POST` ready to be sent.
#[derive(Debug, Clone)]
pub struct TransportRequest {
	pub url: String,
	pub content_type: &'static str,
	/// Full `Authorization` header value, e.g. `Bearer <key>`.
	pub authorization: SecretString,
	pub body: serde_json::Value,
}

/// Raw provider answer: status and undecoded body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	pub status: u16,
	pub body: String,
}

impl TransportResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}
}

/// Sends a [`TransportRequest`] and returns whatever the server answered.
///
/// Implementations report only transport failures as errors; non-2xx
/// statuses are returned as ordinary responses for the client to judge.
#[async_trait]
pub trait HttpTransport: Send + Sync {
	async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	http_client: Client,
}

impl ReqwestTransport {
	/// Builds a transport with [`DEFAULT_TIMEOUT`].
	pub fn new() -> Result<Self> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(timeout: Duration) -> Result<Self> {
		let http_client = dappier_common_http::new_client_with_timeout(timeout)?;
		Ok(Self { http_client })
	}

	/// Wraps an existing client, e.g. one with a proxy configured.
	pub fn from_client(http_client: Client) -> Self {
		Self { http_client }
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
		trace!(url = %request.url, "POST via reqwest");

		let response = self
			.http_client
			.post(&request.url)
			.header(CONTENT_TYPE, request.content_type)
			.header(AUTHORIZATION, request.authorization.expose().as_str())
			.json(&request.body)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					error!("Request timed out");
					return DappierError::Timeout;
				}
				error!(error = %e, "Network error during Dappier request");
				DappierError::Network(e)
			})?;

		let status = response.status().as_u16();
		let body = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			DappierError::Network(e)
		})?;

		Ok(TransportResponse { status, body })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_debug_hides_authorization() {
		let request = TransportRequest {
			url: "https://api.dappier.com/app/datamodel".to_string(),
			content_type: "application/json",
			authorization: SecretString::from("Bearer ak_live_abcdef"),
			body: serde_json::json!({"query": "q"}),
		};

		let debug = format!("{request:?}");
		assert!(!debug.contains("ak_live_abcdef"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn reqwest_transport_builds_with_custom_timeout() {
		assert!(ReqwestTransport::with_timeout(Duration::from_secs(1)).is_ok());
	}
}
