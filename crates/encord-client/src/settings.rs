// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Codec configuration.
//!
//! Settings are layered with the `config` crate, later sources overriding
//! earlier ones:
//!
//! 1. Built-in defaults.
//! 2. A configuration file (TOML, JSON or YAML by extension). When no path is
//!    given, `codec.toml` in the platform configuration directory is used if
//!    it exists.
//! 3. Environment variables prefixed with `ENCORD_CODEC_`.
//!
//! ```bash
//! export ENCORD_CODEC_BACKEND=scalar          # auto | scalar | parallel
//! export ENCORD_CODEC_APPROXIMATION=none      # simple | none
//! export ENCORD_CODEC_PARALLEL_THRESHOLD=65536
//! ```

use crate::{ChainApproximation, Error, bitmask::DEFAULT_PARALLEL_THRESHOLD};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "ENCORD_CODEC";
const CONFIG_FILE_NAME: &str = "codec.toml";

/// Which codec backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Probe once at construction time.
    #[default]
    Auto,
    Scalar,
    Parallel,
}

/// Settings for [`BitmaskCodec`](crate::bitmask::BitmaskCodec) and the
/// contour tracer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Codec backend selection.
    pub backend: BackendChoice,
    /// Chain approximation applied to traced contours.
    pub approximation: ChainApproximation,
    /// Minimum mask length before the parallel backend splits work.
    pub parallel_threshold: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            backend: BackendChoice::Auto,
            approximation: ChainApproximation::Simple,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CodecSettings {
    /// Load settings from defaults, an optional file and the environment.
    ///
    /// An explicit `path` must exist; the default per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("backend", "auto")?
            .set_default("approximation", "simple")?
            .set_default("parallel_threshold", defaults.parallel_threshold as u64)?;

        match path {
            Some(path) => {
                debug!("Loading codec settings from {:?}", path);
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    debug!("Looking for codec settings in {:?}", path);
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<CodecSettings>()?;

        Ok(settings)
    }

    /// Location of the per-user settings file, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "Encord", "Encord SDK")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
