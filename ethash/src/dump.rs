//! Memory-mapped artifact dumps.
//!
//! A dump is the artifact's words in native byte order, prefixed by a two-word
//! magic. Every writer fills its own uniquely named `.tmp` sibling and renames
//! it into place once flushed, so a reader never maps a partially written
//! dump, even with several writers racing on the same artifact.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::algorithm::ALGORITHM_REVISION;
use crate::artifact::ArtifactKind;
use crate::epoch::EpochKey;
use crate::EthashError;

pub(crate) const MAGIC: [u32; 2] = [0xbadd_cafe, 0xfee1_dead];

const ENDIAN_SUFFIX: &str = if cfg!(target_endian = "big") { ".be" } else { "" };

const TEMP_SUFFIX: &str = ".tmp";

/// Read-only mapping of a validated dump file.
pub struct MappedDump {
    mmap: Mmap,
    _file: File,
    path: PathBuf,
}

impl MappedDump {
    /// The artifact words, magic excluded.
    pub fn words(&self) -> &[u32] {
        // SAFETY: any bit pattern is a valid u32, and the mapping was checked
        // to be word aligned and to start with the magic when it was made.
        let (_, body, _) = unsafe { self.mmap.align_to::<u32>() };
        &body[MAGIC.len()..]
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MappedDump {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "unmapping ethash dump");
    }
}

/// A dump that could not be written.
///
/// `words` holds the generated content when the failure happened after the
/// fill ran, so the caller can keep it in memory instead of regenerating.
#[derive(Debug)]
pub(crate) struct Unpersisted {
    pub(crate) error: EthashError,
    pub(crate) words: Option<Vec<u32>>,
}

impl From<EthashError> for Unpersisted {
    fn from(error: EthashError) -> Self {
        Self { error, words: None }
    }
}

impl From<std::io::Error> for Unpersisted {
    fn from(error: std::io::Error) -> Self {
        EthashError::from(error).into()
    }
}

/// File name of the dump for `key`.
pub fn file_name(kind: ArtifactKind, key: EpochKey, seed: &[u8; 32]) -> String {
    format!(
        "{}-R{}-{}-{}-{}{}",
        kind.as_str(),
        ALGORITHM_REVISION,
        key.epoch,
        key.epoch_length,
        hex::encode(&seed[..8]),
        ENDIAN_SUFFIX
    )
}

fn dump_len(words: usize) -> u64 {
    (MAGIC.len() + words) as u64 * 4
}

/// The artifact words of a complete dump image.
fn body(bytes: &[u8], words: usize) -> Result<&[u32], EthashError> {
    let expected = dump_len(words);
    if bytes.len() as u64 != expected {
        return Err(EthashError::SizeMismatch {
            expected,
            actual: bytes.len() as u64,
        });
    }
    // SAFETY: any bit pattern is a valid u32.
    let (prefix, body, _) = unsafe { bytes.align_to::<u32>() };
    if !prefix.is_empty() || body.len() < MAGIC.len() || body[..MAGIC.len()] != MAGIC {
        return Err(EthashError::BadMagic);
    }
    Ok(&body[MAGIC.len()..])
}

/// Map an existing dump holding `words` words.
pub(crate) fn load(path: &Path, words: usize) -> Result<MappedDump, EthashError> {
    let file = File::open(path)?;
    map_file(file, path, words)
}

fn map_file(file: File, path: &Path, words: usize) -> Result<MappedDump, EthashError> {
    let expected = dump_len(words);
    let actual = file.metadata()?.len();
    if actual != expected {
        return Err(EthashError::SizeMismatch { expected, actual });
    }

    // SAFETY: dumps are never modified in place; they are only ever replaced
    // by renaming a complete file over them.
    let mmap = unsafe { Mmap::map(&file)? };
    body(&mmap, words)?;
    Ok(MappedDump {
        mmap,
        _file: file,
        path: path.to_path_buf(),
    })
}

/// Write a new dump of `words` words produced by `fill`, then map it.
pub(crate) fn create<F>(path: &Path, words: usize, fill: &F) -> Result<MappedDump, Unpersisted>
where
    F: Fn(&mut [u32]),
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = tempfile::Builder::new()
        .prefix(&format!("{name}."))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;

    let mmap = fill_temp(&temp, words, fill)?;
    if let Err(e) = mmap.flush() {
        return Err(Unpersisted {
            error: e.into(),
            words: body(&mmap, words).ok().map(<[u32]>::to_vec),
        });
    }
    drop(mmap);

    let file = match temp.persist(path) {
        Ok(file) => file,
        Err(e) => {
            return Err(Unpersisted {
                words: recover(e.file.as_file(), words),
                error: e.error.into(),
            });
        }
    };
    file.try_clone()
        .map_err(EthashError::from)
        .and_then(|handle| map_file(handle, path, words))
        .map_err(|error| Unpersisted {
            words: recover(&file, words),
            error,
        })
}

fn fill_temp<F>(temp: &NamedTempFile, words: usize, fill: &F) -> Result<MmapMut, EthashError>
where
    F: Fn(&mut [u32]),
{
    let len = dump_len(words);
    temp.as_file().set_len(len)?;

    // SAFETY: the temp file was created by this call under a unique name and
    // is not mapped anywhere else.
    let mut mmap = unsafe { MmapMut::map_mut(temp.as_file())? };

    // SAFETY: any bit pattern is a valid u32.
    let (prefix, body, _) = unsafe { mmap.align_to_mut::<u32>() };
    if !prefix.is_empty() || body.len() != MAGIC.len() + words {
        return Err(EthashError::SizeMismatch {
            expected: len,
            actual: (body.len() * 4) as u64,
        });
    }
    body[..MAGIC.len()].copy_from_slice(&MAGIC);
    fill(&mut body[MAGIC.len()..]);
    Ok(mmap)
}

/// Read back the words of a filled temp file that could not be renamed.
fn recover(file: &File, words: usize) -> Option<Vec<u32>> {
    // SAFETY: the temp file is owned by this writer and no longer mapped
    // mutably.
    let mmap = unsafe { Mmap::map(file).ok()? };
    body(&mmap, words).ok().map(<[u32]>::to_vec)
}

/// Delete dumps of `kind` that lie more than `limit` epochs before `key`.
///
/// Temp files left behind by interrupted writers are removed under the same
/// rule. Best effort: unreadable directories and undeletable files are
/// skipped.
pub(crate) fn prune(dir: &Path, kind: ArtifactKind, key: EpochKey, limit: usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let window = (limit.max(1) as u64).saturating_mul(key.epoch_length);
    let threshold = key.first_block();

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(first_block) = parse_first_block(name, kind) else {
            continue;
        };
        if first_block.saturating_add(window) <= threshold {
            match fs::remove_file(entry.path()) {
                Ok(()) => debug!(file = name, "pruned stale ethash dump"),
                Err(e) => debug!(file = name, error = %e, "failed to prune ethash dump"),
            }
        }
    }
}

/// First block of the epoch a dump file name describes, if the name belongs
/// to `kind` under the current revision.
fn parse_first_block(name: &str, kind: ArtifactKind) -> Option<u64> {
    let mut parts = name.split('-');
    if parts.next()? != kind.as_str() {
        return None;
    }
    if parts.next()? != format!("R{ALGORITHM_REVISION}") {
        return None;
    }
    let epoch: u64 = parts.next()?.parse().ok()?;
    let epoch_length: u64 = parts.next()?.parse().ok()?;
    Some(epoch.saturating_mul(epoch_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_sequence(words: &mut [u32]) {
        for (i, word) in words.iter_mut().enumerate() {
            *word = i as u32 * 3 + 1;
        }
    }

    #[test]
    fn file_name_layout() {
        let mut seed = [0u8; 32];
        seed[0] = 0xab;
        let name = file_name(ArtifactKind::Cache, EpochKey::new(4, 30_000), &seed);
        assert!(name.starts_with("cache-R23-4-30000-ab00000000000000"));
        assert_eq!(
            parse_first_block(&name, ArtifactKind::Cache),
            Some(120_000)
        );
        assert_eq!(parse_first_block(&name, ArtifactKind::Dataset), None);
    }

    #[test]
    fn create_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache-R23-0-30000-0000000000000000");

        let created = create(&path, 64, &fill_sequence).expect("create dump");
        let mut expected = vec![0u32; 64];
        fill_sequence(&mut expected);
        assert_eq!(created.words(), expected.as_slice());
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 1);

        let loaded = load(&path, 64).expect("load dump");
        assert_eq!(loaded.words(), expected.as_slice());
        assert_eq!(loaded.path(), path.as_path());
    }

    #[test]
    fn truncated_dump_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dump");
        create(&path, 64, &fill_sequence).expect("create dump");

        let file = fs::OpenOptions::new().write(true).open(&path).expect("open");
        file.set_len(100).expect("truncate");
        drop(file);

        assert!(matches!(
            load(&path, 64),
            Err(EthashError::SizeMismatch {
                expected: 264,
                actual: 100
            })
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dump");
        fs::write(&path, vec![0u8; dump_len(4) as usize]).expect("write");
        assert!(matches!(load(&path, 4), Err(EthashError::BadMagic)));
    }

    #[test]
    fn missing_dump_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load(&dir.path().join("absent"), 4),
            Err(EthashError::Io(_))
        ));
    }

    #[test]
    fn prune_removes_only_stale_dumps_of_same_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let seed = [0u8; 32];
        for epoch in 0..5 {
            let key = EpochKey::new(epoch, 30_000);
            fs::write(dir.path().join(file_name(ArtifactKind::Cache, key, &seed)), b"x")
                .expect("write cache");
            fs::write(
                dir.path().join(file_name(ArtifactKind::Dataset, key, &seed)),
                b"x",
            )
            .expect("write dataset");
        }
        let stray = dir.path().join("cache-R23-0-30000-0000000000000000.a1B2c3.tmp");
        fs::write(&stray, b"x").expect("write temp");
        let in_progress = dir.path().join("cache-R23-4-30000-0000000000000000.d4E5f6.tmp");
        fs::write(&in_progress, b"x").expect("write temp");

        prune(dir.path(), ArtifactKind::Cache, EpochKey::new(4, 30_000), 2);

        let seed = [0u8; 32];
        for epoch in 0..5 {
            let key = EpochKey::new(epoch, 30_000);
            let cache = dir.path().join(file_name(ArtifactKind::Cache, key, &seed));
            let dataset = dir.path().join(file_name(ArtifactKind::Dataset, key, &seed));
            assert_eq!(cache.exists(), epoch >= 3, "cache epoch {epoch}");
            assert!(dataset.exists(), "dataset epoch {epoch}");
        }
        assert!(!stray.exists());
        assert!(in_progress.exists());
    }

    #[test]
    fn concurrent_writers_of_one_dump_both_succeed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dataset-R23-0-30000-0000000000000000");
        let words = 1 << 16;
        let barrier = std::sync::Barrier::new(2);
        let mut expected = vec![0u32; words];
        fill_sequence(&mut expected);

        let fill = |dest: &mut [u32]| {
            barrier.wait();
            fill_sequence(dest);
        };
        std::thread::scope(|s| {
            let writers: Vec<_> = (0..2)
                .map(|_| s.spawn(|| create(&path, words, &fill).expect("create dump")))
                .collect();
            for writer in writers {
                let dump = writer.join().expect("writer panicked");
                assert_eq!(dump.words(), expected.as_slice());
            }
        });

        let loaded = load(&path, words).expect("load dump");
        assert_eq!(loaded.words(), expected.as_slice());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .flatten()
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_rename_keeps_filled_words() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory in the way makes the final rename fail after the fill.
        let path = dir.path().join("cache-R23-0-30000-0000000000000000");
        fs::create_dir(&path).expect("mkdir");
        fs::write(path.join("occupied"), b"x").expect("write");

        let failure = match create(&path, 64, &fill_sequence) {
            Ok(_) => panic!("rename over a non-empty directory succeeded"),
            Err(failure) => failure,
        };
        let mut expected = vec![0u32; 64];
        fill_sequence(&mut expected);
        assert_eq!(failure.words, Some(expected));
    }
}
