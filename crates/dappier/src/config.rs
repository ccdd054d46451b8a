// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered client configuration.
//!
//! Each source (config file, environment, command line) produces a
//! [`DappierConfigLayer`]; layers are merged in precedence order and then
//! finalized into a validated [`DappierConfig`].

use std::time::Duration;

use dappier_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{DappierError, Result};

/// Real-time search endpoint, also the parent of `/{datamodel_id}` routes.
pub const DEFAULT_BASE_URL: &str = "https://api.dappier.com/app/datamodel";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DappierConfigLayer {
	pub api_key: Option<SecretString>,
	pub base_url: Option<String>,
	pub timeout_secs: Option<u64>,
}

impl DappierConfigLayer {
	/// Overlays `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<DappierConfig> {
		let api_key = match self.api_key {
			Some(key) if !key.is_empty() => key,
			_ => return Err(DappierError::Config("API key cannot be empty".to_string())),
		};

		Ok(DappierConfig {
			api_key,
			base_url: self
				.base_url
				.filter(|url| !url.is_empty())
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
			timeout: self.timeout_secs.map(Duration::from_secs),
		})
	}
}

/// Validated configuration for building a [`DappierClient`](crate::DappierClient).
#[derive(Debug, Clone, Serialize)]
pub struct DappierConfig {
	pub api_key: SecretString,
	pub base_url: String,
	/// Request timeout; `None` uses the transport default.
	pub timeout: Option<Duration>,
}

impl DappierConfig {
	pub fn new(api_key: impl Into<String>) -> Result<Self> {
		DappierConfigLayer {
			api_key: Some(SecretString::new(api_key.into())),
			..Default::default()
		}
		.finalize()
	}
}
