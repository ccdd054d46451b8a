// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Dappier API client.

use thiserror::Error;

/// Errors that can occur when talking to the Dappier API.
#[derive(Debug, Error)]
pub enum DappierError {
	/// Client configuration is unusable (for example an empty API key).
	#[error("Configuration error: {0}")]
	Config(String),

	/// A required call parameter was empty.
	#[error("Invalid argument: {0}")]
	InvalidArgument(&'static str),

	/// The provider answered with a status other than 200.
	#[error("Received non-OK response status: {status}")]
	Http { status: u16, body: String },

	/// The provider answered 200 but the decoded body was empty.
	#[error("No results found")]
	EmptyResult,

	/// The body could not be decoded into the expected shape.
	#[error("Invalid response from Dappier: {0}")]
	InvalidResponse(String),

	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,
}

impl DappierError {
	/// HTTP status of a non-OK provider response, if this is one.
	pub fn status(&self) -> Option<u16> {
		match self {
			DappierError::Http { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Result type alias for Dappier operations.
pub type Result<T> = std::result::Result<T, DappierError>;
