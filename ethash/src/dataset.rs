//! Mining dataset.

use crate::algorithm::generate_dataset;
use crate::artifact::{produce, ArtifactKind, Content, EpochArtifact, GenerateSettings};
use crate::cache::Cache;
use crate::epoch::EpochKey;
use crate::gate::GenerationGate;

/// The full mining dataset of one epoch.
///
/// [`is_generated`](EpochArtifact::is_generated) never blocks, so miners can
/// poll a dataset that is being built in the background.
pub struct Dataset {
    key: EpochKey,
    gate: GenerationGate<Content>,
}

impl Dataset {
    /// Dataset words, or an empty slice before generation.
    pub fn words(&self) -> &[u32] {
        self.gate.get().map(Content::words).unwrap_or(&[])
    }

    pub fn is_mapped(&self) -> bool {
        self.gate.get().is_some_and(Content::is_mapped)
    }
}

impl EpochArtifact for Dataset {
    const KIND: ArtifactKind = ArtifactKind::Dataset;

    fn new(key: EpochKey) -> Self {
        Self {
            key,
            gate: GenerationGate::new(),
        }
    }

    fn key(&self) -> EpochKey {
        self.key
    }

    fn generate(&self, settings: &GenerateSettings) {
        self.gate.get_or_generate(|| {
            let words = (settings.mode.dataset_bytes(self.key) / 4) as usize;
            produce(Self::KIND, self.key, words, settings, |dest| {
                // The dataset is derived from a throwaway in-memory cache.
                let cache = Cache::build_words(self.key, settings);
                generate_dataset(dest, &cache);
            })
        });
    }

    fn is_generated(&self) -> bool {
        self.gate.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{dataset_item, HASH_WORDS};
    use crate::config::Mode;
    use crate::metrics::EthashMetrics;
    use std::sync::Arc;

    fn settings(dir: Option<std::path::PathBuf>) -> GenerateSettings {
        GenerateSettings {
            dir,
            files_on_disk: 2,
            mode: Mode::Test,
            metrics: Arc::new(EthashMetrics::new()),
        }
    }

    #[test]
    fn dataset_items_derive_from_epoch_cache() {
        let settings = settings(None);
        let key = EpochKey::new(1, 30_000);
        let dataset = Dataset::new(key);
        assert!(!dataset.is_generated());
        assert!(dataset.words().is_empty());

        dataset.generate(&settings);
        assert!(dataset.is_generated());
        assert_eq!(dataset.words().len(), 32 * 1024 / 4);

        let cache = Cache::build_words(key, &settings);
        assert_eq!(&dataset.words()[..HASH_WORDS], &dataset_item(&cache, 0));
    }

    #[test]
    fn persisted_dataset_matches_in_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key = EpochKey::new(3, 30_000);

        let mapped = Dataset::new(key);
        mapped.generate(&settings(Some(dir.path().to_path_buf())));
        assert!(mapped.is_mapped());

        let memory = Dataset::new(key);
        memory.generate(&settings(None));
        assert!(!memory.is_mapped());
        assert_eq!(mapped.words(), memory.words());
    }
}
