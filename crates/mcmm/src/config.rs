//! Run settings, layered: command-line flag, then environment variable,
//! then TOML file, then built-in default.
//!
//! clap resolves the first two layers (each flag carries an `env`), so a
//! `None` in [`ClusterArgs`] means neither was given.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use foundation::{ClusterConfig, CoreId, Timeout, DEFAULT_MAT_SIZE, MAIN_CORE};
use memory::CacheModel;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CORES: u16 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheModelArg {
    #[default]
    Coherent,
    WriteBack,
}

impl From<CacheModelArg> for CacheModel {
    fn from(arg: CacheModelArg) -> Self {
        match arg {
            CacheModelArg::Coherent => CacheModel::Coherent,
            CacheModelArg::WriteBack => CacheModel::WriteBack,
        }
    }
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub cores: Option<u16>,
    pub mat_size: Option<usize>,
    pub coordinator: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub cache_model: Option<CacheModelArg>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[derive(Args, Debug, Default)]
pub struct ClusterArgs {
    /// Number of cores (must divide the matrix size)
    #[arg(long, env = "MCMM_CORES")]
    pub cores: Option<u16>,

    /// Matrix dimension
    #[arg(long, env = "MCMM_MAT_SIZE")]
    pub mat_size: Option<usize>,

    /// Identity of the coordinating core
    #[arg(long, env = "MCMM_COORDINATOR")]
    pub coordinator: Option<u16>,

    /// Mailbox timeout in milliseconds; 0 waits forever
    #[arg(long, env = "MCMM_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Cache model of the simulated cores
    #[arg(long, value_enum, env = "MCMM_CACHE_MODEL")]
    pub cache_model: Option<CacheModelArg>,

    /// TOML file with default settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub cluster: ClusterConfig,
    pub timeout: Timeout,
    pub timeout_ms: u64,
    pub cache_model: CacheModelArg,
}

impl ClusterArgs {
    pub fn resolve(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.layer(file)
    }

    fn layer(&self, file: FileConfig) -> Result<Settings> {
        let cores = self.cores.or(file.cores).unwrap_or(DEFAULT_CORES);
        let mat_size = self.mat_size.or(file.mat_size).unwrap_or(DEFAULT_MAT_SIZE);
        let coordinator = self
            .coordinator
            .or(file.coordinator)
            .map(CoreId)
            .unwrap_or(MAIN_CORE);
        let timeout_ms = self.timeout_ms.or(file.timeout_ms).unwrap_or(0);
        let cache_model = self.cache_model.or(file.cache_model).unwrap_or_default();

        let cluster = ClusterConfig::with_coordinator(cores, mat_size, coordinator)
            .context("invalid cluster configuration")?;
        log::debug!("resolved {cluster:?}, timeout {timeout_ms}ms, {cache_model:?}");

        Ok(Settings {
            cluster,
            timeout: Timeout::from_millis(timeout_ms),
            timeout_ms,
            cache_model,
        })
    }
}
