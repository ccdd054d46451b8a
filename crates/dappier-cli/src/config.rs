// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Config file discovery and layering for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML config file,
//! environment variables and flags (both resolved by clap).

use std::path::{Path, PathBuf};

use dappier::{DappierConfig, DappierConfigLayer};

use crate::error::ConfigError;

/// Resolve the user config file: `$XDG_CONFIG_HOME/dappier/config.toml`,
/// falling back to `~/.config/dappier/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
	let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
		Some(dir) => PathBuf::from(dir),
		None => dirs::home_dir()
			.ok_or(ConfigError::HomeDirNotFound)?
			.join(".config"),
	};

	let path = config_home.join("dappier/config.toml");
	tracing::debug!(path = %path.display(), "resolved config path");
	Ok(path)
}

/// Read one TOML layer. A missing file is an empty layer.
pub fn load_file_layer(path: &Path) -> Result<DappierConfigLayer, ConfigError> {
	if !path.exists() {
		tracing::debug!(path = %path.display(), "no config file, skipping");
		return Ok(DappierConfigLayer::default());
	}

	let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})?;

	toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
		path: path.to_path_buf(),
		source,
	})
}

/// Merge the file layer with `overrides` and validate the result.
///
/// An explicitly requested `config_path` must exist; the default one may not.
pub fn resolve(
	config_path: Option<&Path>,
	overrides: DappierConfigLayer,
) -> Result<DappierConfig, ConfigError> {
	let mut layer = match config_path {
		Some(path) if !path.exists() => {
			return Err(ConfigError::Io {
				path: path.to_path_buf(),
				source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
			});
		}
		Some(path) => load_file_layer(path)?,
		None => load_file_layer(&default_config_path()?)?,
	};

	layer.merge(overrides);
	layer
		.finalize()
		.map_err(|e| ConfigError::validation(format!("{e} (set DAPPIER_API_KEY, --api-key or api_key in the config file)")))
}
