//! Prometheus metrics for the ethash artifact stores.
//!
//! Every series carries a `kind` label (`cache` or `dataset`). The
//! [`EthashMetrics`] struct owns a dedicated [`Registry`] that the embedding
//! node can encode into the Prometheus text exposition format.

use std::time::Duration;

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry, HistogramOpts,
    HistogramVec, IntCounterVec, Opts, Registry,
};

use crate::artifact::ArtifactKind;

/// Central collection of all ethash store metrics.
pub struct EthashMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Requests served by an artifact already held in the store.
    pub hits: IntCounterVec,
    /// Requests that admitted a new artifact.
    pub misses: IntCounterVec,
    /// Requests served by promoting the prefetched artifact.
    pub promotions: IntCounterVec,
    /// Artifacts evicted from the store.
    pub evictions: IntCounterVec,
    /// Completed generations, including those satisfied from a dump.
    pub generations: IntCounterVec,
    /// Artifacts mapped from an existing dump.
    pub disk_loads: IntCounterVec,
    /// Artifacts kept in memory after a dump could not be written.
    pub disk_fallbacks: IntCounterVec,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time to produce an artifact, in milliseconds.
    pub generation_time_ms: HistogramVec,
}

impl EthashMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let hits = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_store_hits_total",
                "Artifact requests served from the store"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register hits counter");

        let misses = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_store_misses_total",
                "Artifact requests that admitted a new artifact"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register misses counter");

        let promotions = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_store_promotions_total",
                "Prefetched artifacts promoted into the store"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register promotions counter");

        let evictions = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_store_evictions_total",
                "Artifacts evicted from the store"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register evictions counter");

        let generations = register_int_counter_vec_with_registry!(
            Opts::new("ethash_generations_total", "Artifacts produced"),
            &["kind"],
            registry
        )
        .expect("failed to register generations counter");

        let disk_loads = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_disk_loads_total",
                "Artifacts mapped from an existing dump"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register disk_loads counter");

        let disk_fallbacks = register_int_counter_vec_with_registry!(
            Opts::new(
                "ethash_disk_fallbacks_total",
                "Artifacts kept in memory after a dump failure"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register disk_fallbacks counter");

        // Exponential buckets covering 1 ms to ~9 min.
        let generation_time_ms = register_histogram_vec_with_registry!(
            HistogramOpts::new(
                "ethash_generation_time_ms",
                "Artifact generation time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 20).unwrap()),
            &["kind"],
            registry
        )
        .expect("failed to register generation_time_ms histogram");

        Self {
            registry,
            hits,
            misses,
            promotions,
            evictions,
            generations,
            disk_loads,
            disk_fallbacks,
            generation_time_ms,
        }
    }

    pub fn hit(&self, kind: ArtifactKind) {
        self.hits.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn miss(&self, kind: ArtifactKind) {
        self.misses.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn promotion(&self, kind: ArtifactKind) {
        self.promotions.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn eviction(&self, kind: ArtifactKind) {
        self.evictions.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn disk_load(&self, kind: ArtifactKind) {
        self.disk_loads.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn disk_fallback(&self, kind: ArtifactKind) {
        self.disk_fallbacks.with_label_values(&[kind.as_str()]).inc();
    }

    /// Record a completed generation and its duration.
    pub fn generated(&self, kind: ArtifactKind, elapsed: Duration) {
        self.generations.with_label_values(&[kind.as_str()]).inc();
        self.generation_time_ms
            .with_label_values(&[kind.as_str()])
            .observe(elapsed.as_secs_f64() * 1_000.0);
    }

    /// Current value of a per-kind counter.
    pub fn count(counter: &IntCounterVec, kind: ArtifactKind) -> u64 {
        counter.with_label_values(&[kind.as_str()]).get()
    }
}

impl Default for EthashMetrics {
    fn default() -> Self {
        Self::new()
    }
}
