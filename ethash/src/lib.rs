//! Ethash verification caches and mining datasets.
//!
//! Both artifacts are deterministic functions of the epoch and expensive to
//! build (tens of megabytes for a cache, gigabytes for a dataset), so each
//! kind lives in an [`EpochStore`]: a small LRU that generates every artifact
//! at most once, optionally persists it as a memory-mapped dump, and
//! prefetches the next epoch in the background.
//!
//! [`Ethash`] ties one cache store and one dataset store to an
//! [`EthashConfig`] and maps block numbers to epochs.

pub mod algorithm;
pub mod artifact;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod dump;
pub mod epoch;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod store;

use std::sync::Arc;

use classic_types::BlockNumber;

pub use artifact::{ArtifactKind, EpochArtifact, GenerateSettings};
pub use cache::Cache;
pub use config::{EthashConfig, Mode};
pub use dataset::Dataset;
pub use epoch::{calc_epoch, epoch_length, EpochKey};
pub use error::EthashError;
pub use gate::{GenerationGate, Phase};
pub use metrics::EthashMetrics;
pub use store::EpochStore;

/// Cache and dataset stores for one chain.
pub struct Ethash {
    config: EthashConfig,
    caches: EpochStore<Cache>,
    datasets: EpochStore<Dataset>,
    metrics: Arc<EthashMetrics>,
}

impl Ethash {
    pub fn new(config: EthashConfig) -> Self {
        let metrics = Arc::new(EthashMetrics::new());
        let caches = EpochStore::new(
            config.caches_in_mem,
            GenerateSettings {
                dir: config.cache_dir.clone(),
                files_on_disk: config.caches_on_disk,
                mode: config.mode,
                metrics: Arc::clone(&metrics),
            },
            config.ecip1099_block,
        );
        let datasets = EpochStore::new(
            config.datasets_in_mem,
            GenerateSettings {
                dir: config.dataset_dir.clone(),
                files_on_disk: config.datasets_on_disk,
                mode: config.mode,
                metrics: Arc::clone(&metrics),
            },
            config.ecip1099_block,
        );
        Self {
            config,
            caches,
            datasets,
            metrics,
        }
    }

    /// Epoch key of `block` under this chain's ECIP-1099 activation.
    pub fn epoch_key(&self, block: BlockNumber) -> EpochKey {
        EpochKey::for_block(block, self.config.ecip1099_block)
    }

    /// Generated verification cache for the epoch of `block`.
    pub fn cache(&self, block: BlockNumber) -> Arc<Cache> {
        self.caches.acquire(self.epoch_key(block))
    }

    /// Mining dataset for the epoch of `block`.
    ///
    /// With `background` set, a dataset that is not generated yet is returned
    /// immediately and built on a background thread; poll
    /// [`is_generated`](EpochArtifact::is_generated) to see when it is usable.
    pub fn dataset(&self, block: BlockNumber, background: bool) -> Arc<Dataset> {
        let key = self.epoch_key(block);
        if !background {
            return self.datasets.acquire(key);
        }

        let (current, future) = self.datasets.get(key);
        let mut pending = Vec::new();
        if !current.is_generated() {
            pending.push(Arc::clone(&current));
        }
        pending.extend(future);
        self.datasets.spawn_generation(pending);
        current
    }

    pub fn caches(&self) -> &EpochStore<Cache> {
        &self.caches
    }

    pub fn datasets(&self) -> &EpochStore<Dataset> {
        &self.datasets
    }

    pub fn metrics(&self) -> &EthashMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &EthashConfig {
        &self.config
    }
}
