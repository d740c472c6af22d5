//! Epoch artifact store.
//!
//! A bounded LRU of artifacts plus one "future" slot holding the artifact of
//! the epoch after the furthest one ever requested. The store lock only
//! covers bookkeeping; generation runs outside it under each artifact's own
//! gate. Evicted artifacts are dropped after the lock is released and are
//! freed once the last reader lets go of them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, warn};

use classic_lru::BasicLru;
use classic_types::BlockNumber;

use crate::artifact::{EpochArtifact, GenerateSettings};
use crate::epoch::EpochKey;

struct StoreState<T> {
    entries: BasicLru<EpochKey, Arc<T>>,
    future: Option<Arc<T>>,
}

pub struct EpochStore<T: EpochArtifact> {
    state: Mutex<StoreState<T>>,
    settings: Arc<GenerateSettings>,
    ecip1099_block: Option<BlockNumber>,
}

impl<T: EpochArtifact> EpochStore<T> {
    /// Create a store holding up to `capacity` artifacts (zero is treated as
    /// one), not counting the future slot.
    pub fn new(
        capacity: usize,
        settings: GenerateSettings,
        ecip1099_block: Option<BlockNumber>,
    ) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: BasicLru::new(capacity),
                future: None,
            }),
            settings: Arc::new(settings),
            ecip1099_block,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> &GenerateSettings {
        &self.settings
    }

    /// Look up or admit the artifact for `key` without generating anything.
    ///
    /// Also returns a freshly created future artifact when the future slot
    /// had to be advanced, so the caller can schedule its generation.
    pub fn get(&self, key: EpochKey) -> (Arc<T>, Option<Arc<T>>) {
        let metrics = &self.settings.metrics;
        let mut released: Vec<Arc<T>> = Vec::new();

        let (current, future) = {
            let mut state = self.lock();

            let promoted = match state.future.take() {
                Some(future) if future.key() == key => Some(future),
                other => {
                    state.future = other;
                    None
                }
            };

            let current = if let Some(item) = promoted {
                metrics.promotion(T::KIND);
                debug!(kind = T::KIND.as_str(), epoch = %key, "promoted prefetched ethash artifact");
                if let Some((_, evicted)) = state.entries.push(key, Arc::clone(&item)) {
                    released.push(evicted);
                }
                item
            } else if let Some(item) = state.entries.get(&key) {
                metrics.hit(T::KIND);
                Arc::clone(item)
            } else {
                metrics.miss(T::KIND);
                debug!(kind = T::KIND.as_str(), epoch = %key, "admitting ethash artifact");
                let item = Arc::new(T::new(key));
                if let Some((_, evicted)) = state.entries.push(key, Arc::clone(&item)) {
                    released.push(evicted);
                }
                item
            };

            let stale = state
                .future
                .as_ref()
                .map_or(true, |future| future.key().first_block() <= key.first_block());
            let future = if stale {
                let item = Arc::new(T::new(key.next(self.ecip1099_block)));
                if let Some(old) = state.future.replace(Arc::clone(&item)) {
                    released.push(old);
                }
                Some(item)
            } else {
                None
            };

            (current, future)
        };

        for item in released {
            metrics.eviction(T::KIND);
            debug!(kind = T::KIND.as_str(), epoch = %item.key(), "evicted ethash artifact");
        }

        (current, future)
    }

    /// Return the generated artifact for `key`, prefetching the next epoch in
    /// the background.
    pub fn acquire(&self, key: EpochKey) -> Arc<T> {
        let (current, future) = self.get(key);
        current.generate(&self.settings);
        if let Some(future) = future {
            self.spawn_generation(vec![future]);
        }
        current
    }

    /// Generate `items` one after another on a detached thread.
    pub fn spawn_generation(&self, items: Vec<Arc<T>>) {
        if items.is_empty() {
            return;
        }
        let settings = Arc::clone(&self.settings);
        let spawned = thread::Builder::new()
            .name(format!("ethash-{}-prefetch", T::KIND.as_str()))
            .spawn(move || {
                for item in items {
                    item.generate(&settings);
                }
            });
        if let Err(e) = spawned {
            warn!(kind = T::KIND.as_str(), error = %e, "failed to spawn ethash generation thread");
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.capacity()
    }

    /// Keys held in the store, most recently used first.
    pub fn keys(&self) -> Vec<EpochKey> {
        self.lock().entries.keys()
    }

    /// Key of the artifact held in the future slot.
    pub fn future_key(&self) -> Option<EpochKey> {
        self.lock().future.as_ref().map(|future| future.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use crate::config::Mode;
    use crate::gate::GenerationGate;
    use crate::metrics::EthashMetrics;
    use std::collections::HashMap;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{LazyLock, Weak};
    use std::time::Duration;

    /// Generation counts per key. Each test uses its own epoch length so the
    /// counts never interfere across parallel tests.
    static GENERATIONS: LazyLock<Mutex<HashMap<EpochKey, usize>>> =
        LazyLock::new(|| Mutex::new(HashMap::new()));

    static FAIL_NEXT: AtomicBool = AtomicBool::new(false);
    static FAIL_LENGTH: AtomicU64 = AtomicU64::new(0);

    fn generations(key: EpochKey) -> usize {
        GENERATIONS
            .lock()
            .unwrap()
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    struct Counting {
        key: EpochKey,
        gate: GenerationGate<u64>,
    }

    impl EpochArtifact for Counting {
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

        fn generate(&self, _settings: &GenerateSettings) {
            self.gate.get_or_generate(|| {
                if FAIL_LENGTH.load(Ordering::SeqCst) == self.key.epoch_length
                    && FAIL_NEXT.swap(false, Ordering::SeqCst)
                {
                    panic!("generation failed");
                }
                thread::sleep(Duration::from_millis(20));
                *GENERATIONS.lock().unwrap().entry(self.key).or_default() += 1;
                self.key.epoch * 1_000 + self.key.epoch_length
            });
        }

        fn is_generated(&self) -> bool {
            self.gate.is_ready()
        }
    }

    fn store(capacity: usize) -> EpochStore<Counting> {
        let settings = GenerateSettings {
            dir: None,
            files_on_disk: 1,
            mode: Mode::Test,
            metrics: Arc::new(EthashMetrics::new()),
        };
        EpochStore::new(capacity, settings, None)
    }

    fn count(counter: &prometheus::IntCounterVec) -> u64 {
        EthashMetrics::count(counter, ArtifactKind::Cache)
    }

    #[test]
    fn concurrent_acquire_generates_once() {
        let store = Arc::new(store(2));
        let key = EpochKey::new(5, 101);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.acquire(key))
            })
            .collect();
        let items: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect();

        assert_eq!(generations(key), 1);
        assert!(items.iter().all(|item| Arc::ptr_eq(item, &items[0])));
        assert!(items.iter().all(|item| item.is_generated()));
        assert_eq!(items[0].gate.get(), Some(&(5 * 1_000 + 101)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn first_get_schedules_next_epoch() {
        let store = store(2);
        let (current, future) = store.get(EpochKey::new(3, 102));
        assert_eq!(current.key(), EpochKey::new(3, 102));
        assert_eq!(future.map(|f| f.key()), Some(EpochKey::new(4, 102)));
        assert_eq!(store.future_key(), Some(EpochKey::new(4, 102)));
        assert!(!current.is_generated());
        assert_eq!(count(&store.settings.metrics.misses), 1);
    }

    #[test]
    fn future_slot_is_promoted() {
        let store = store(2);
        store.get(EpochKey::new(3, 103));

        let (current, future) = store.get(EpochKey::new(4, 103));
        assert_eq!(current.key(), EpochKey::new(4, 103));
        assert_eq!(future.map(|f| f.key()), Some(EpochKey::new(5, 103)));
        assert_eq!(store.keys(), vec![EpochKey::new(4, 103), EpochKey::new(3, 103)]);
        assert_eq!(count(&store.settings.metrics.promotions), 1);
        assert_eq!(count(&store.settings.metrics.misses), 1);
    }

    #[test]
    fn promoted_artifact_keeps_prefetched_content() {
        let store = store(2);
        let (_, future) = store.get(EpochKey::new(0, 104));
        let future = future.expect("future scheduled");
        future.generate(store.settings());

        let current = store.acquire(EpochKey::new(1, 104));
        assert!(Arc::ptr_eq(&current, &future));
        assert_eq!(generations(EpochKey::new(1, 104)), 1);
    }

    #[test]
    fn older_epoch_does_not_move_future_slot() {
        let store = store(3);
        store.get(EpochKey::new(10, 105));
        let (_, future) = store.get(EpochKey::new(2, 105));
        assert!(future.is_none());
        assert_eq!(store.future_key(), Some(EpochKey::new(11, 105)));
    }

    #[test]
    fn repeated_request_hits() {
        let store = store(2);
        store.get(EpochKey::new(1, 106));
        let (_, future) = store.get(EpochKey::new(1, 106));
        assert!(future.is_none());
        assert_eq!(count(&store.settings.metrics.hits), 1);
    }

    #[test]
    fn capacity_is_respected() {
        let store = store(3);
        for epoch in 0..20 {
            store.get(EpochKey::new(epoch * 2, 107));
            assert!(store.len() <= 3);
        }
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.keys(),
            vec![
                EpochKey::new(38, 107),
                EpochKey::new(36, 107),
                EpochKey::new(34, 107)
            ]
        );
        assert!(!store.keys().contains(&store.future_key().expect("future")));
    }

    #[test]
    fn zero_capacity_holds_one() {
        let store = store(0);
        assert_eq!(store.capacity(), 1);
        store.get(EpochKey::new(0, 108));
        store.get(EpochKey::new(5, 108));
        assert_eq!(store.keys(), vec![EpochKey::new(5, 108)]);
    }

    #[test]
    fn evicted_artifact_is_released() {
        let store = store(1);
        let first: Weak<Counting> = Arc::downgrade(&store.acquire(EpochKey::new(10, 109)));
        assert!(first.upgrade().is_some());

        store.acquire(EpochKey::new(5, 109));
        assert!(first.upgrade().is_none());
        assert_eq!(count(&store.settings.metrics.evictions), 1);
    }

    #[test]
    fn evicted_artifact_survives_while_borrowed() {
        let store = store(1);
        let held = store.acquire(EpochKey::new(10, 110));
        store.acquire(EpochKey::new(5, 110));
        assert!(!store.keys().contains(&held.key()));
        assert_eq!(held.gate.get(), Some(&(10 * 1_000 + 110)));
    }

    #[test]
    fn panicking_generation_can_be_retried() {
        let store = store(1);
        let key = EpochKey::new(1, 111);
        FAIL_LENGTH.store(111, Ordering::SeqCst);
        FAIL_NEXT.store(true, Ordering::SeqCst);

        let result = catch_unwind(AssertUnwindSafe(|| store.acquire(key)));
        assert!(result.is_err());
        assert_eq!(generations(key), 0);

        let item = store.acquire(key);
        assert!(item.is_generated());
        assert_eq!(generations(key), 1);
    }
}
