// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for the Dappier crates.
//!
//! Every outbound client carries the same User-Agent so provider-side logs
//! can tell SDK traffic apart from other callers.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
