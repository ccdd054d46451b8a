// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Dappier API client implementation.

use std::fmt;
use std::sync::Arc;

use dappier_common_secret::SecretString;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, instrument, trace};

use crate::config::{DappierConfig, DEFAULT_BASE_URL};
use crate::error::{DappierError, Result};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use crate::types::{AiRecommendationsResult, RealtimeSearchResult, SearchRequest, SearchResult};

/// Search endpoint. Always used as-is, whatever base URL the client has.
pub const SEARCH_URL: &str = "https://api.dappier.com/app/v2/search";

const CONTENT_TYPE: &str = "application/json";

/// Client for the Dappier real-time search, recommendations and search APIs.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct DappierClient {
	transport: Arc<dyn HttpTransport>,
	api_key: SecretString,
	base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchApiResponse {
	#[serde(default)]
	status: Option<Value>,
	#[serde(default)]
	response: Option<SearchApiPayload>,
}

#[derive(Debug, Deserialize)]
struct SearchApiPayload {
	#[serde(default)]
	results: Option<Value>,
}

impl DappierClient {
	/// Creates a client using the default reqwest transport.
	pub fn new(api_key: impl Into<String>) -> Result<Self> {
		let api_key = validate_api_key(api_key.into())?;
		let transport = ReqwestTransport::new()?;
		Ok(Self::assemble(api_key, Arc::new(transport)))
	}

	/// Creates a client that sends every request through `transport`.
	pub fn with_transport(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Result<Self> {
		let api_key = validate_api_key(api_key.into())?;
		Ok(Self::assemble(api_key, transport))
	}

	/// Creates a client from a finalized configuration.
	pub fn from_config(config: &DappierConfig) -> Result<Self> {
		if config.api_key.is_empty() {
			return Err(DappierError::Config("API key cannot be empty".to_string()));
		}
		let transport = match config.timeout {
			Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
			None => ReqwestTransport::new()?,
		};
		Ok(Self::assemble(config.api_key.clone(), Arc::new(transport)).with_base_url(config.base_url.clone()))
	}

	/// Sets a custom base URL for the real-time and recommendations endpoints.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn assemble(api_key: SecretString, transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			transport,
			api_key,
			base_url: DEFAULT_BASE_URL.to_string(),
		}
	}

	/// Looks up real-time data for `query` and returns the first entry.
	#[instrument(skip(self))]
	pub async fn realtime_search(&self, query: &str) -> Result<RealtimeSearchResult> {
		require(query, "query cannot be empty")?;

		let body = self.post(self.base_url.clone(), json!({ "query": query })).await?;
		let response = match body {
			Value::Array(items) => items.into_iter().next().ok_or(DappierError::EmptyResult)?,
			other => {
				error!("Real-time search body is not an array");
				return Err(DappierError::InvalidResponse(format!(
					"expected a JSON array, got {}",
					kind_of(&other)
				)));
			}
		};

		debug!("Real-time search completed successfully");
		Ok(RealtimeSearchResult { response })
	}

	/// Fetches AI recommendations from the datamodel `datamodel_id`.
	#[instrument(skip(self, request), fields(query = %request.query, similarity_top_k = request.similarity_top_k))]
	pub async fn ai_recommendations(
		&self,
		datamodel_id: &str,
		request: &SearchRequest,
	) -> Result<AiRecommendationsResult> {
		require(&request.query, "query cannot be empty")?;
		require(datamodel_id, "datamodel id cannot be empty")?;

		let url = format!("{}/{}", self.base_url.trim_end_matches('/'), datamodel_id);
		let results = self.post(url, request_body(request)).await?;

		debug!("AI recommendations completed successfully");
		Ok(AiRecommendationsResult { results })
	}

	/// Searches the datamodel `datamodel_id` through the v2 search endpoint.
	#[instrument(skip(self, request), fields(query = %request.query, similarity_top_k = request.similarity_top_k))]
	pub async fn search(&self, datamodel_id: &str, request: &SearchRequest) -> Result<SearchResult> {
		require(&request.query, "query cannot be empty")?;
		require(datamodel_id, "datamodel id cannot be empty")?;

		let url = format!("{SEARCH_URL}?data_model_id={datamodel_id}");
		let body = self.post(url, request_body(request)).await?;

		let parsed: SearchApiResponse = serde_json::from_value(body).map_err(|e| {
			error!(error = %e, "Failed to parse search response");
			DappierError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		let results = parsed.response.and_then(|payload| payload.results);

		debug!(has_results = results.is_some(), "Search completed successfully");

		Ok(SearchResult {
			results,
			status: parsed.status,
		})
	}

	/// Sends one request and returns the decoded, non-empty body.
	async fn post(&self, url: String, body: Value) -> Result<Value> {
		debug!(url = %url, "Sending request to Dappier");
		trace!(body = %body, "Request body");

		let request = TransportRequest {
			url,
			content_type: CONTENT_TYPE,
			authorization: SecretString::new(format!("Bearer {}", self.api_key.expose())),
			body,
		};

		let response = self.transport.post_json(request).await?;
		debug!(status = response.status, "Received response from Dappier");

		if response.status != 200 {
			error!(status = response.status, body = %response.body, "Dappier API error");
			return Err(DappierError::Http {
				status: response.status,
				body: response.body,
			});
		}

		trace!(body = %response.body, "Response body");
		decode_body(&response.body)
	}
}

impl fmt::Debug for DappierClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DappierClient")
			.field("api_key", &self.api_key)
			.field("base_url", &self.base_url)
			.finish_non_exhaustive()
	}
}

fn validate_api_key(api_key: String) -> Result<SecretString> {
	let api_key = SecretString::new(api_key);
	if api_key.is_empty() {
		return Err(DappierError::Config("API key cannot be empty".to_string()));
	}
	Ok(api_key)
}

fn require(value: &str, reason: &'static str) -> Result<()> {
	if value.is_empty() {
		return Err(DappierError::InvalidArgument(reason));
	}
	Ok(())
}

fn request_body(request: &SearchRequest) -> Value {
	json!({
		"query": request.query,
		"similarity_top_k": request.similarity_top_k,
		"ref": request.ref_domain,
		"num_articles_ref": request.num_articles_ref,
	})
}

/// Decodes a body, treating blank, `null`, `[]`, `{}`, `""`, `false` and `0` as no result.
fn decode_body(body: &str) -> Result<Value> {
	if body.trim().is_empty() {
		return Err(DappierError::EmptyResult);
	}

	let value: Value = serde_json::from_str(body).map_err(|e| {
		error!(error = %e, "Failed to parse Dappier response");
		DappierError::InvalidResponse(format!("JSON parse error: {e}"))
	})?;

	if is_empty_value(&value) {
		return Err(DappierError::EmptyResult);
	}
	Ok(value)
}

fn is_empty_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::TransportResponse;
	use async_trait::async_trait;
	use proptest::prelude::*;
	use std::sync::atomic::{AtomicBool, Ordering};
	use tokio::sync::Mutex;

	struct MockTransport {
		response: TransportResponse,
		requests: Mutex<Vec<TransportRequest>>,
		should_time_out: AtomicBool,
	}

	impl MockTransport {
		fn new(status: u16, body: &str) -> Arc<Self> {
			Arc::new(Self {
				response: TransportResponse::new(status, body),
				requests: Mutex::new(Vec::new()),
				should_time_out: AtomicBool::new(false),
			})
		}

		fn ok(body: Value) -> Arc<Self> {
			Self::new(200, &body.to_string())
		}

		async fn requests(&self) -> Vec<TransportRequest> {
			self.requests.lock().await.clone()
		}
	}

	#[async_trait]
	impl HttpTransport for MockTransport {
		async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
			self.requests.lock().await.push(request);
			if self.should_time_out.load(Ordering::SeqCst) {
				return Err(DappierError::Timeout);
			}
			Ok(self.response.clone())
		}
	}

	fn client(transport: &Arc<MockTransport>) -> DappierClient {
		DappierClient::with_transport("test-api-key", transport.clone()).unwrap()
	}

	#[test]
	fn test_client_creation_defaults_base_url() {
		let transport = MockTransport::ok(json!([1]));
		let client = client(&transport);
		assert_eq!(client.api_key.expose(), "test-api-key");
		assert_eq!(client.base_url(), DEFAULT_BASE_URL);
	}

	#[test]
	fn test_with_base_url() {
		let transport = MockTransport::ok(json!([1]));
		let client = client(&transport).with_base_url("https://custom.api.com");
		assert_eq!(client.base_url(), "https://custom.api.com");
	}

	#[test]
	fn test_empty_api_key_is_config_error() {
		let transport = MockTransport::ok(json!([1]));
		assert!(matches!(
			DappierClient::with_transport("", transport),
			Err(DappierError::Config(_))
		));
		assert!(matches!(DappierClient::new(""), Err(DappierError::Config(_))));
	}

	#[test]
	fn test_from_config_uses_configured_base_url() {
		let mut config = DappierConfig::new("key").unwrap();
		config.base_url = "http://localhost:9999/app/datamodel".to_string();
		config.timeout = Some(std::time::Duration::from_secs(2));

		let client = DappierClient::from_config(&config).unwrap();
		assert_eq!(client.base_url(), "http://localhost:9999/app/datamodel");
	}

	#[test]
	fn test_debug_hides_api_key() {
		let transport = MockTransport::ok(json!([1]));
		let debug = format!("{:?}", client(&transport));
		assert!(!debug.contains("test-api-key"));
	}

	#[tokio::test]
	async fn test_realtime_search_returns_first_entry() {
		let transport = MockTransport::ok(json!([{"title": "X"}, {"title": "Y"}]));
		let client = client(&transport);

		let result = client.realtime_search("q").await.unwrap();
		assert_eq!(result.response, json!({"title": "X"}));

		let requests = transport.requests().await;
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, DEFAULT_BASE_URL);
		assert_eq!(requests[0].content_type, "application/json");
		assert_eq!(requests[0].authorization.expose(), "Bearer test-api-key");
		assert_eq!(requests[0].body, json!({"query": "q"}));
	}

	#[tokio::test]
	async fn test_realtime_search_rejects_non_array_body() {
		let transport = MockTransport::ok(json!({"title": "X"}));
		let result = client(&transport).realtime_search("q").await;
		assert!(matches!(result, Err(DappierError::InvalidResponse(_))));
	}

	#[tokio::test]
	async fn test_ai_recommendations_sends_defaults_and_returns_body() {
		let transport = MockTransport::ok(json!({"a": 1}));
		let client = client(&transport);

		let result = client
			.ai_recommendations("dm1", &SearchRequest::new("q"))
			.await
			.unwrap();
		assert_eq!(result.results, json!({"a": 1}));

		let requests = transport.requests().await;
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, format!("{DEFAULT_BASE_URL}/dm1"));
		assert_eq!(
			requests[0].body,
			json!({"query": "q", "similarity_top_k": 9, "ref": "", "num_articles_ref": 0})
		);
	}

	#[tokio::test]
	async fn test_ai_recommendations_sends_custom_options() {
		let transport = MockTransport::ok(json!([{"title": "T"}]));
		let client = client(&transport).with_base_url("https://custom.api.com/");

		let request = SearchRequest::new("latest tech news")
			.with_similarity_top_k(5)
			.with_ref("techcrunch.com")
			.with_num_articles_ref(2);
		client.ai_recommendations("dm_02hr", &request).await.unwrap();

		let requests = transport.requests().await;
		assert_eq!(requests[0].url, "https://custom.api.com/dm_02hr");
		assert_eq!(
			requests[0].body,
			json!({
				"query": "latest tech news",
				"similarity_top_k": 5,
				"ref": "techcrunch.com",
				"num_articles_ref": 2
			})
		);
	}

	#[tokio::test]
	async fn test_search_extracts_results_and_status() {
		let transport = MockTransport::ok(json!({"status": "ok", "response": {"results": [1, 2, 3]}}));
		let client = client(&transport);

		let result = client.search("dm1", &SearchRequest::new("q")).await.unwrap();
		assert_eq!(result.results, Some(json!([1, 2, 3])));
		assert_eq!(result.status, Some(json!("ok")));
	}

	#[tokio::test]
	async fn test_search_ignores_base_url() {
		let transport = MockTransport::ok(json!({"status": "ok"}));
		let client = client(&transport).with_base_url("https://custom.api.com");

		client.search("dm1", &SearchRequest::new("q")).await.unwrap();

		let requests = transport.requests().await;
		assert_eq!(
			requests[0].url,
			"https://api.dappier.com/app/v2/search?data_model_id=dm1"
		);
		assert_eq!(requests[0].authorization.expose(), "Bearer test-api-key");
	}

	#[tokio::test]
	async fn test_search_missing_results_is_none() {
		let transport = MockTransport::ok(json!({"status": "ok", "response": {}}));
		let result = client(&transport)
			.search("dm1", &SearchRequest::new("q"))
			.await
			.unwrap();
		assert_eq!(result.results, None);
		assert_eq!(result.status, Some(json!("ok")));
	}

	#[tokio::test]
	async fn test_search_passes_through_non_string_status() {
		let transport = MockTransport::ok(json!({"status": 200, "response": {"results": [1]}}));
		let result = client(&transport)
			.search("dm1", &SearchRequest::new("q"))
			.await
			.unwrap();
		assert_eq!(result.status, Some(json!(200)));
		assert_eq!(result.results, Some(json!([1])));
	}

	#[tokio::test]
	async fn test_search_passes_through_non_array_results() {
		let transport = MockTransport::ok(json!({"status": "ok", "response": {"results": {"a": 1}}}));
		let result = client(&transport)
			.search("dm1", &SearchRequest::new("q"))
			.await
			.unwrap();
		assert_eq!(result.results, Some(json!({"a": 1})));
	}

	#[test]
	fn test_client_is_clone_send_sync() {
		fn assert_clone_send_sync<T: Clone + Send + Sync>() {}
		assert_clone_send_sync::<DappierClient>();
	}

	#[tokio::test]
	async fn test_empty_arguments_never_reach_transport() {
		let transport = MockTransport::ok(json!([1]));
		let client = client(&transport);
		let empty_query = SearchRequest::new("");
		let query = SearchRequest::new("q");

		assert!(matches!(
			client.realtime_search("").await,
			Err(DappierError::InvalidArgument(_))
		));
		assert!(matches!(
			client.ai_recommendations("dm1", &empty_query).await,
			Err(DappierError::InvalidArgument(_))
		));
		assert!(matches!(
			client.ai_recommendations("", &query).await,
			Err(DappierError::InvalidArgument(_))
		));
		assert!(matches!(
			client.search("dm1", &empty_query).await,
			Err(DappierError::InvalidArgument(_))
		));
		assert!(matches!(
			client.search("", &query).await,
			Err(DappierError::InvalidArgument(_))
		));

		assert!(transport.requests().await.is_empty());
	}

	#[tokio::test]
	async fn test_server_error_fails_every_operation_after_one_request() {
		let request = SearchRequest::new("q");

		let transport = MockTransport::new(500, "boom");
		let err = client(&transport).realtime_search("q").await.unwrap_err();
		assert_eq!(err.status(), Some(500));
		assert_eq!(transport.requests().await.len(), 1);

		let transport = MockTransport::new(500, "boom");
		let err = client(&transport)
			.ai_recommendations("dm1", &request)
			.await
			.unwrap_err();
		assert_eq!(err.status(), Some(500));
		assert_eq!(transport.requests().await.len(), 1);

		let transport = MockTransport::new(500, "boom");
		let err = client(&transport).search("dm1", &request).await.unwrap_err();
		assert!(matches!(err, DappierError::Http { status: 500, .. }));
		assert_eq!(transport.requests().await.len(), 1);
	}

	#[tokio::test]
	async fn test_empty_bodies_are_empty_result() {
		let request = SearchRequest::new("q");
		for body in ["[]", "{}", "", "  ", "null"] {
			let transport = MockTransport::new(200, body);
			let client = client(&transport);

			assert!(
				matches!(client.realtime_search("q").await, Err(DappierError::EmptyResult)),
				"realtime_search with body {body:?}"
			);
			assert!(
				matches!(
					client.ai_recommendations("dm1", &request).await,
					Err(DappierError::EmptyResult)
				),
				"ai_recommendations with body {body:?}"
			);
			assert!(
				matches!(client.search("dm1", &request).await, Err(DappierError::EmptyResult)),
				"search with body {body:?}"
			);
		}
	}

	#[tokio::test]
	async fn test_malformed_json_is_invalid_response() {
		let transport = MockTransport::new(200, "{not json");
		let result = client(&transport)
			.ai_recommendations("dm1", &SearchRequest::new("q"))
			.await;
		assert!(matches!(result, Err(DappierError::InvalidResponse(_))));
	}

	#[tokio::test]
	async fn test_transport_failure_propagates() {
		let transport = MockTransport::ok(json!([1]));
		transport.should_time_out.store(true, Ordering::SeqCst);

		let result = client(&transport).realtime_search("q").await;
		assert!(matches!(result, Err(DappierError::Timeout)));
	}

	#[test]
	fn test_is_empty_value_matches_falsy_json() {
		for value in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
			assert!(is_empty_value(&value), "{value} should be empty");
		}
		for value in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": null})] {
			assert!(!is_empty_value(&value), "{value} should not be empty");
		}
	}

	proptest! {
		/// Only status 200 is accepted; anything else surfaces as an HTTP error.
		#[test]
		fn non_ok_status_is_http_error(status in 100u16..600) {
			prop_assume!(status != 200);
			let transport = MockTransport::new(status, r#"[{"title":"X"}]"#);
			let client = client(&transport);

			let result = tokio_test::block_on(client.realtime_search("q"));
			prop_assert_eq!(result.unwrap_err().status(), Some(status));
		}

		/// An empty key is rejected whatever base URL is configured afterwards.
		#[test]
		fn empty_api_key_always_rejected(base_url in "https?://[a-z]{1,12}\\.[a-z]{2,3}(/[a-z]{0,8})?") {
			let transport = MockTransport::ok(json!([1]));
			let result = DappierClient::with_transport("", transport)
				.map(|client| client.with_base_url(base_url));
			prop_assert!(matches!(result, Err(DappierError::Config(_))));
		}
	}
}
