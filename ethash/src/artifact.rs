//! The capability shared by caches and datasets.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use classic_utils::format_duration;

use crate::algorithm::seed_hash;
use crate::config::Mode;
use crate::dump::{self, MappedDump};
use crate::epoch::EpochKey;
use crate::metrics::EthashMetrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Cache,
    Dataset,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how one store generates its artifacts.
pub struct GenerateSettings {
    /// Dump directory; `None` generates in memory only.
    pub dir: Option<PathBuf>,
    /// Number of most recent dumps kept when pruning.
    pub files_on_disk: usize,
    pub mode: Mode,
    pub metrics: Arc<EthashMetrics>,
}

/// An epoch-indexed, generate-once artifact managed by an
/// [`EpochStore`](crate::EpochStore).
///
/// Constructing an artifact is cheap; the content is only computed by
/// [`generate`](EpochArtifact::generate), which must be idempotent and safe to
/// call from several threads at once. Dropping the artifact releases its
/// content, including any file mapping.
pub trait EpochArtifact: Send + Sync + 'static {
    const KIND: ArtifactKind;

    fn new(key: EpochKey) -> Self;

    fn key(&self) -> EpochKey;

    fn generate(&self, settings: &GenerateSettings);

    fn is_generated(&self) -> bool;
}

/// Generated words, either owned or mapped from a dump file.
pub enum Content {
    Memory(Vec<u32>),
    Mapped(MappedDump),
}

impl Content {
    pub fn words(&self) -> &[u32] {
        match self {
            Self::Memory(words) => words,
            Self::Mapped(dump) => dump.words(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

/// Produce the content for `key`, going through the dump directory if one
/// is configured.
///
/// Reuses a valid existing dump, otherwise writes a new one and prunes old
/// dumps. Any disk failure degrades to an in-memory artifact; `fill` runs
/// again only if the failed write never got as far as filling.
pub(crate) fn produce<F>(
    kind: ArtifactKind,
    key: EpochKey,
    words: usize,
    settings: &GenerateSettings,
    fill: F,
) -> Content
where
    F: Fn(&mut [u32]),
{
    let started = Instant::now();
    let content = match &settings.dir {
        None => in_memory(words, &fill),
        Some(dir) => {
            let path = dir.join(dump::file_name(kind, key, &seed_hash(key)));
            match dump::load(&path, words) {
                Ok(mapped) => {
                    settings.metrics.disk_load(kind);
                    Content::Mapped(mapped)
                }
                Err(_) => match dump::create(&path, words, &fill) {
                    Ok(mapped) => {
                        dump::prune(dir, kind, key, settings.files_on_disk);
                        Content::Mapped(mapped)
                    }
                    Err(failure) => {
                        warn!(
                            kind = kind.as_str(),
                            epoch = %key,
                            path = %path.display(),
                            error = %failure.error,
                            "failed to persist ethash artifact, keeping it in memory"
                        );
                        settings.metrics.disk_fallback(kind);
                        match failure.words {
                            Some(generated) => Content::Memory(generated),
                            None => in_memory(words, &fill),
                        }
                    }
                },
            }
        }
    };

    let elapsed = started.elapsed();
    settings.metrics.generated(kind, elapsed);
    info!(
        kind = kind.as_str(),
        epoch = %key,
        mapped = content.is_mapped(),
        elapsed = %format_duration(elapsed),
        "ethash {kind} ready"
    );
    content
}

fn in_memory<F>(words: usize, fill: &F) -> Content
where
    F: Fn(&mut [u32]),
{
    let mut buf = vec![0u32; words];
    fill(&mut buf);
    Content::Memory(buf)
}
