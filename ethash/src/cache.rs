//! Verification cache.

use crate::algorithm::{dataset_item, generate_cache, seed_hash, HASH_WORDS};
use crate::artifact::{produce, ArtifactKind, Content, EpochArtifact, GenerateSettings};
use crate::epoch::EpochKey;
use crate::gate::GenerationGate;

/// The light-verification cache of one epoch.
pub struct Cache {
    key: EpochKey,
    gate: GenerationGate<Content>,
}

impl Cache {
    /// Cache words, or an empty slice before generation.
    pub fn words(&self) -> &[u32] {
        self.gate.get().map(Content::words).unwrap_or(&[])
    }

    /// Whether the content is mapped from a dump file.
    pub fn is_mapped(&self) -> bool {
        self.gate.get().is_some_and(Content::is_mapped)
    }

    /// Derive one dataset item from this cache, for light verification.
    pub fn dataset_item(&self, index: u32) -> Option<[u32; HASH_WORDS]> {
        let words = self.gate.get()?.words();
        Some(dataset_item(words, index))
    }

    /// Produce the content of `key` without a store or dump directory.
    pub(crate) fn build_words(key: EpochKey, settings: &GenerateSettings) -> Vec<u32> {
        let mut words = vec![0u32; (settings.mode.cache_bytes(key) / 4) as usize];
        generate_cache(&mut words, &seed_hash(key));
        words
    }
}

impl EpochArtifact for Cache {
    const KIND: ArtifactKind = ArtifactKind::Cache;

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
            let words = (settings.mode.cache_bytes(self.key) / 4) as usize;
            let seed = seed_hash(self.key);
            produce(Self::KIND, self.key, words, settings, |dest| {
                generate_cache(dest, &seed)
            })
        });
    }

    fn is_generated(&self) -> bool {
        self.gate.is_ready()
    }
}
