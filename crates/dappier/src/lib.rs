// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Async client for the Dappier API.
//!
//! Three calls are offered, each a single authenticated JSON `POST`:
//!
//! - [`DappierClient::realtime_search`]: real-time data for a free-text query.
//! - [`DappierClient::ai_recommendations`]: articles from a datamodel.
//! - [`DappierClient::search`]: the v2 datamodel search endpoint.
//!
//! ```ignore
//! let client = DappierClient::new(api_key)?;
//! let news = client
//!     .ai_recommendations("dm_02hr75e8ate6adr15hjrf3ikol", &SearchRequest::new("latest tech news"))
//!     .await?;
//! ```
//!
//! Requests go through an [`HttpTransport`]; [`ReqwestTransport`] is used
//! unless another one is injected with [`DappierClient::with_transport`].

pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{DappierClient, SEARCH_URL};
pub use config::{DappierConfig, DappierConfigLayer, DEFAULT_BASE_URL};
pub use dappier_common_secret::SecretString;
pub use error::{DappierError, Result};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse, DEFAULT_TIMEOUT};
pub use types::{
	AiRecommendationsResult, RealtimeSearchResult, SearchRequest, SearchResult, DEFAULT_SIMILARITY_TOP_K,
};
