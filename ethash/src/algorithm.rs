//! Cache and dataset derivation.
//!
//! Artifacts are handled as sequences of 32-bit words. Hashing works on the
//! little-endian byte image of each 64-byte row, so the word content is the
//! same on every host; only the dump file stores words in native order.

use rayon::prelude::*;

use classic_crypto::{keccak256, keccak512};

use crate::epoch::{EpochKey, EPOCH_LENGTH_DEFAULT};

/// Revision of the derivation, part of every dump file name.
pub const ALGORITHM_REVISION: u32 = 23;

const CACHE_INIT_BYTES: u64 = 1 << 24;
const CACHE_GROWTH_BYTES: u64 = 1 << 17;
const DATASET_INIT_BYTES: u64 = 1 << 30;
const DATASET_GROWTH_BYTES: u64 = 1 << 23;

/// Bytes in one cache row or dataset item.
pub const HASH_BYTES: usize = 64;
/// Words in one cache row or dataset item.
pub const HASH_WORDS: usize = HASH_BYTES / 4;
const MIX_BYTES: u64 = 128;
const DATASET_PARENTS: u32 = 256;
const CACHE_ROUNDS: usize = 3;

const FNV_PRIME: u32 = 0x0100_0193;

/// Size of the verification cache for `epoch`, in bytes.
///
/// The largest multiple of [`HASH_BYTES`] below the linear growth line whose
/// row count is prime.
pub fn cache_size(epoch: u64) -> u64 {
    let mut size = CACHE_INIT_BYTES + CACHE_GROWTH_BYTES * epoch - HASH_BYTES as u64;
    while !is_prime(size / HASH_BYTES as u64) {
        size -= 2 * HASH_BYTES as u64;
    }
    size
}

/// Size of the mining dataset for `epoch`, in bytes.
pub fn dataset_size(epoch: u64) -> u64 {
    let mut size = DATASET_INIT_BYTES + DATASET_GROWTH_BYTES * epoch - MIX_BYTES;
    while !is_prime(size / MIX_BYTES) {
        size -= 2 * MIX_BYTES;
    }
    size
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Seed of the epoch identified by `key`.
///
/// The seed chain always advances in steps of the default epoch length, so
/// an extended-length epoch shares its seed with the default-length epoch
/// that contains its first block.
pub fn seed_hash(key: EpochKey) -> [u8; 32] {
    let block = key.first_block().saturating_add(1);
    let mut seed = [0u8; 32];
    for _ in 0..block / EPOCH_LENGTH_DEFAULT {
        seed = keccak256(&seed);
    }
    seed
}

#[inline]
fn fnv(a: u32, b: u32) -> u32 {
    a.wrapping_mul(FNV_PRIME) ^ b
}

fn words_to_bytes(words: &[u32]) -> [u8; HASH_BYTES] {
    let mut bytes = [0u8; HASH_BYTES];
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    bytes
}

fn bytes_to_words(bytes: &[u8; HASH_BYTES], words: &mut [u32]) {
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

fn hash_words(words: &mut [u32; HASH_WORDS]) {
    let hashed = keccak512(&words_to_bytes(words));
    bytes_to_words(&hashed, words);
}

/// Fill `dest` with the verification cache derived from `seed`.
///
/// `dest` must hold a whole number of rows; any trailing partial row is left
/// untouched.
pub fn generate_cache(dest: &mut [u32], seed: &[u8; 32]) {
    let rows = dest.len() / HASH_WORDS;
    if rows == 0 {
        return;
    }

    // Sequential Keccak-512 chain.
    let mut row = keccak512(seed);
    bytes_to_words(&row, &mut dest[..HASH_WORDS]);
    for j in 1..rows {
        row = keccak512(&row);
        bytes_to_words(&row, &mut dest[j * HASH_WORDS..(j + 1) * HASH_WORDS]);
    }

    // RandMemoHash rounds.
    let mut mixed = [0u32; HASH_WORDS];
    for _ in 0..CACHE_ROUNDS {
        for j in 0..rows {
            let src = (j + rows - 1) % rows;
            let xor = dest[j * HASH_WORDS] as usize % rows;
            for (w, slot) in mixed.iter_mut().enumerate() {
                *slot = dest[src * HASH_WORDS + w] ^ dest[xor * HASH_WORDS + w];
            }
            let hashed = keccak512(&words_to_bytes(&mixed));
            bytes_to_words(&hashed, &mut dest[j * HASH_WORDS..(j + 1) * HASH_WORDS]);
        }
    }
}

/// Derive dataset item `index` from a verification cache.
pub fn dataset_item(cache: &[u32], index: u32) -> [u32; HASH_WORDS] {
    let rows = (cache.len() / HASH_WORDS) as u32;
    let mut mix = [0u32; HASH_WORDS];
    if rows == 0 {
        return mix;
    }

    let start = (index % rows) as usize * HASH_WORDS;
    mix.copy_from_slice(&cache[start..start + HASH_WORDS]);
    mix[0] ^= index;
    hash_words(&mut mix);

    for i in 0..DATASET_PARENTS {
        let parent = fnv(index ^ i, mix[i as usize % HASH_WORDS]) % rows;
        let offset = parent as usize * HASH_WORDS;
        for (w, word) in mix.iter_mut().enumerate() {
            *word = fnv(*word, cache[offset + w]);
        }
    }
    hash_words(&mut mix);
    mix
}

/// Fill `dest` with the full dataset, deriving items in parallel.
pub fn generate_dataset(dest: &mut [u32], cache: &[u32]) {
    dest.par_chunks_mut(HASH_WORDS)
        .enumerate()
        .for_each(|(index, chunk)| {
            let item = dataset_item(cache, index as u32);
            let len = chunk.len();
            chunk.copy_from_slice(&item[..len]);
        });
}
