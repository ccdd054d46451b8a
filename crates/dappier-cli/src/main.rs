// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dappier CLI.
//!
//! Runs one Dappier API call per invocation and prints the result as pretty
//! JSON on stdout. Logs go to stderr.

mod config;
mod error;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dappier::{DappierClient, DappierConfigLayer, SearchRequest, DEFAULT_SIMILARITY_TOP_K};

#[derive(Parser, Debug)]
#[command(name = "dappier", version, about, long_about = None)]
struct Args {
	/// Dappier API key
	#[arg(long, env = "DAPPIER_API_KEY", hide_env_values = true)]
	api_key: Option<String>,

	/// Base URL for real-time search and recommendations
	#[arg(long, env = "DAPPIER_BASE_URL")]
	base_url: Option<String>,

	/// Request timeout in seconds
	#[arg(long, env = "DAPPIER_TIMEOUT_SECS")]
	timeout_secs: Option<u64>,

	/// Config file (default: $XDG_CONFIG_HOME/dappier/config.toml)
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long, value_enum, default_value = "warn")]
	log_level: LogLevel,

	#[arg(long, value_enum, default_value = "compact")]
	log_format: LogFormat,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Real-time search for a free-text query
	Realtime {
		#[arg(required = true, num_args = 1..)]
		query: Vec<String>,
	},
	/// AI recommendations from a datamodel
	Recommend {
		datamodel_id: String,
		#[arg(required = true, num_args = 1..)]
		query: Vec<String>,
		#[command(flatten)]
		options: SearchOptions,
	},
	/// Search a datamodel through the v2 search endpoint
	Search {
		datamodel_id: String,
		#[arg(required = true, num_args = 1..)]
		query: Vec<String>,
		#[command(flatten)]
		options: SearchOptions,
	},
}

#[derive(clap::Args, Debug)]
struct SearchOptions {
	/// Number of articles to return
	#[arg(long, default_value_t = DEFAULT_SIMILARITY_TOP_K)]
	top_k: u32,

	/// Domain to draw guaranteed results from, e.g. techcrunch.com
	#[arg(long = "ref", default_value = "")]
	ref_domain: String,

	/// Number of results guaranteed to come from --ref
	#[arg(long, default_value_t = 0)]
	num_articles_ref: u32,
}

impl SearchOptions {
	fn into_request(self, query: Vec<String>) -> SearchRequest {
		SearchRequest::new(query.join(" "))
			.with_similarity_top_k(self.top_k)
			.with_ref(self.ref_domain)
			.with_num_articles_ref(self.num_articles_ref)
	}
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
	Pretty,
	Compact,
	Json,
}

fn log_level_to_tracing(level: LogLevel) -> tracing::Level {
	match level {
		LogLevel::Trace => tracing::Level::TRACE,
		LogLevel::Debug => tracing::Level::DEBUG,
		LogLevel::Info => tracing::Level::INFO,
		LogLevel::Warn => tracing::Level::WARN,
		LogLevel::Error => tracing::Level::ERROR,
	}
}

fn init_tracing(level: LogLevel, format: LogFormat) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = log_level_to_tracing(level);
		EnvFilter::new(format!("dappier={level},dappier_cli={level}"))
	});

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().pretty().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.log_level, args.log_format);

	let overrides = DappierConfigLayer {
		api_key: args.api_key.map(Into::into),
		base_url: args.base_url,
		timeout_secs: args.timeout_secs,
	};
	let config = config::resolve(args.config.as_deref(), overrides)
		.context("failed to load Dappier configuration")?;
	debug!(base_url = %config.base_url, api_key = %config.api_key, "configuration loaded");

	let client = DappierClient::from_config(&config).context("failed to create Dappier client")?;

	let output: Value = match args.command {
		Command::Realtime { query } => {
			let query = query.join(" ");
			info!(query = %query, "running real-time search");
			let result = client
				.realtime_search(&query)
				.await
				.context("real-time search failed")?;
			serde_json::to_value(result)?
		}
		Command::Recommend {
			datamodel_id,
			query,
			options,
		} => {
			let request = options.into_request(query);
			info!(datamodel_id = %datamodel_id, query = %request.query, "fetching AI recommendations");
			let result = client
				.ai_recommendations(&datamodel_id, &request)
				.await
				.context("AI recommendations failed")?;
			serde_json::to_value(result)?
		}
		Command::Search {
			datamodel_id,
			query,
			options,
		} => {
			let request = options.into_request(query);
			info!(datamodel_id = %datamodel_id, query = %request.query, "searching datamodel");
			let result = client
				.search(&datamodel_id, &request)
				.await
				.context("search failed")?;
			serde_json::to_value(result)?
		}
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
