//! Ethash configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use classic_types::{BlockNumber, ForkConfigurator};

use crate::algorithm::{cache_size, dataset_size};
use crate::epoch::EpochKey;
use crate::EthashError;

/// How large the generated artifacts are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full-size caches and datasets.
    #[default]
    Normal,
    /// Tiny caches and datasets for tests and development chains.
    Test,
}

const TEST_CACHE_BYTES: u64 = 1024;
const TEST_DATASET_BYTES: u64 = 32 * 1024;

impl Mode {
    /// Size of the verification cache for `key`, in bytes.
    pub fn cache_bytes(&self, key: EpochKey) -> u64 {
        match self {
            Self::Normal => cache_size(key.size_index()),
            Self::Test => TEST_CACHE_BYTES,
        }
    }

    /// Size of the mining dataset for `key`, in bytes.
    pub fn dataset_bytes(&self, key: EpochKey) -> u64 {
        match self {
            Self::Normal => dataset_size(key.size_index()),
            Self::Test => TEST_DATASET_BYTES,
        }
    }
}

/// Configuration of the ethash artifact stores.
///
/// Can be loaded from a TOML file via [`EthashConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthashConfig {
    /// Directory for persisted verification caches. `None` keeps caches in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of caches held in memory (the prefetched one excluded).
    #[serde(default = "default_caches_in_mem")]
    pub caches_in_mem: usize,

    /// Number of most recent cache dumps kept on disk.
    #[serde(default = "default_caches_on_disk")]
    pub caches_on_disk: usize,

    /// Directory for persisted mining datasets. `None` keeps datasets in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_dir: Option<PathBuf>,

    /// Maximum number of datasets held in memory (the prefetched one excluded).
    #[serde(default = "default_datasets_in_mem")]
    pub datasets_in_mem: usize,

    /// Number of most recent dataset dumps kept on disk.
    #[serde(default = "default_datasets_on_disk")]
    pub datasets_on_disk: usize,

    #[serde(default)]
    pub mode: Mode,

    /// Activation height of ECIP-1099 (doubled epoch length).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecip1099_block: Option<BlockNumber>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_caches_in_mem() -> usize {
    2
}

fn default_caches_on_disk() -> usize {
    3
}

fn default_datasets_in_mem() -> usize {
    1
}

fn default_datasets_on_disk() -> usize {
    2
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EthashConfig {
    /// Default configuration with the ECIP-1099 height taken from a chain.
    pub fn for_chain(forks: &impl ForkConfigurator) -> Self {
        Self {
            ecip1099_block: forks.ethash_ecip1099_transition(),
            ..Self::default()
        }
    }

    /// Small in-memory artifacts, for tests.
    pub fn test() -> Self {
        Self {
            mode: Mode::Test,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EthashError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EthashError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EthashError> {
        toml::from_str(s).map_err(|e| EthashError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EthashError> {
        toml::to_string_pretty(self).map_err(|e| EthashError::Config(e.to_string()))
    }
}

impl Default for EthashConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            caches_in_mem: default_caches_in_mem(),
            caches_on_disk: default_caches_on_disk(),
            dataset_dir: None,
            datasets_in_mem: default_datasets_in_mem(),
            datasets_on_disk: default_datasets_on_disk(),
            mode: Mode::Normal,
            ecip1099_block: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classic_types::ChainConfig;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EthashConfig {
            cache_dir: Some(PathBuf::from("/var/lib/classic/ethash")),
            ecip1099_block: Some(11_700_000),
            ..EthashConfig::default()
        };
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = EthashConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EthashConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, EthashConfig::default());
        assert_eq!(config.caches_in_mem, 2);
        assert_eq!(config.datasets_in_mem, 1);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            caches_in_mem = 4
            dataset_dir = "/data/ethash"
            mode = "test"
        "#;
        let config = EthashConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.caches_in_mem, 4);
        assert_eq!(config.dataset_dir, Some(PathBuf::from("/data/ethash")));
        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.caches_on_disk, 3); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = EthashConfig::from_toml_file("/nonexistent/ethash.toml");
        assert!(matches!(result, Err(EthashError::Config(_))));
    }

    #[test]
    fn for_chain_picks_up_ecip1099() {
        let config = EthashConfig::for_chain(&ChainConfig::mordor());
        assert_eq!(config.ecip1099_block, Some(2_520_000));
    }

    #[test]
    fn test_mode_sizes_are_tiny() {
        let key = EpochKey::new(1_000, 30_000);
        assert_eq!(Mode::Test.cache_bytes(key), 1024);
        assert_eq!(Mode::Test.dataset_bytes(key), 32 * 1024);
        assert_eq!(Mode::Normal.cache_bytes(EpochKey::new(0, 30_000)), cache_size(0));
    }

    #[test]
    fn extended_epochs_are_sized_by_default_length() {
        let extended = EpochKey::new(195, 60_000);
        assert_eq!(Mode::Normal.cache_bytes(extended), cache_size(390));
        assert_eq!(Mode::Normal.dataset_bytes(extended), dataset_size(390));
        assert_eq!(Mode::Normal.cache_bytes(extended) / 4, 16_973_776);
        assert_eq!(
            Mode::Normal.cache_bytes(extended),
            Mode::Normal.cache_bytes(EpochKey::new(390, 30_000))
        );
    }
}
