//! Configuration types for kinlog.
//!
//! [`Config::load`] layers, from lowest to highest priority: the embedded
//! defaults, `~/.config/kinlog/config.toml` (or an explicit path), and
//! `KINLOG_*` environment variables (`KINLOG_ENCODER__PARTITION_KEY=hash`).
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::partition_key::KeyStrategy;

/// Upper bound on entries in a single `PutRecords` request.
pub const MAX_PUT_RECORDS_BATCH: usize = 500;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[parse]
skip_invalid = false

[encoder]
partition_key = "random"
batch_size    = 500

[upload]
gzip = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// `[parse]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseConfig {
    /// Log and skip records whose data cannot be decoded instead of aborting.
    #[serde(default)]
    pub skip_invalid: bool,
}

/// `[encoder]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderConfig {
    #[serde(default)]
    pub partition_key: KeyStrategy,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize { MAX_PUT_RECORDS_BATCH }

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            partition_key: KeyStrategy::default(),
            batch_size: default_batch_size(),
        }
    }
}

/// `[upload]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_gzip")]
    pub gzip: bool,
}

fn default_gzip() -> bool { true }

impl Default for UploadConfig {
    fn default() -> Self {
        Self { gzip: default_gzip() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration layered on top of the built-in defaults.
    ///
    /// With `path = None` the user config file is optional; an explicit path
    /// must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], but reads `KINLOG_*` overrides from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("KINLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_PUT_RECORDS_BATCH).contains(&self.encoder.batch_size) {
            anyhow::bail!(
                "encoder.batch_size must be between 1 and {MAX_PUT_RECORDS_BATCH}, got {}",
                self.encoder.batch_size
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("kinlog")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
