// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request and result types for the Dappier API.

use serde::{Deserialize, Serialize};

/// Number of articles requested when the caller does not say otherwise.
pub const DEFAULT_SIMILARITY_TOP_K: u32 = 9;

/// Parameters shared by the recommendations and search endpoints.
///
/// `query` may be natural language or a URL. `ref_domain` restricts part of
/// the results to one source domain (e.g. `techcrunch.com`), and
/// `num_articles_ref` is how many of the results are guaranteed to come from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub similarity_top_k: u32,
	#[serde(rename = "ref")]
	pub ref_domain: String,
	pub num_articles_ref: u32,
}

impl SearchRequest {
	/// Creates a request with the provider defaults: top-k 9, no ref domain.
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
			ref_domain: String::new(),
			num_articles_ref: 0,
		}
	}

	pub fn with_similarity_top_k(mut self, similarity_top_k: u32) -> Self {
		self.similarity_top_k = similarity_top_k;
		self
	}

	pub fn with_ref(mut self, ref_domain: impl Into<String>) -> Self {
		self.ref_domain = ref_domain.into();
		self
	}

	pub fn with_num_articles_ref(mut self, num_articles_ref: u32) -> Self {
		self.num_articles_ref = num_articles_ref;
		self
	}
}

/// Result of a real-time search: the first entry the provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeSearchResult {
	pub response: serde_json::Value,
}

/// Result of an AI recommendations call: the decoded body, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecommendationsResult {
	pub results: serde_json::Value,
}

/// Result of a datamodel search.
///
/// Both fields are passed through as the provider sent them; `results` is
/// `None` when the body has no `response.results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub results: Option<serde_json::Value>,
	pub status: Option<serde_json::Value>,
}
