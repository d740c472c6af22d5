//! Epoch arithmetic.
//!
//! An epoch is a run of consecutive blocks sharing one cache and one dataset.
//! Its length is 30 000 blocks until ECIP-1099 activates and 60 000 blocks
//! afterwards, so an epoch number alone is ambiguous: artifacts are keyed by
//! [`EpochKey`], the `(epoch, epoch_length)` pair.

use std::fmt;

use classic_types::BlockNumber;

/// Blocks per epoch before ECIP-1099.
pub const EPOCH_LENGTH_DEFAULT: u64 = 30_000;

/// Blocks per epoch once ECIP-1099 is active.
pub const EPOCH_LENGTH_ECIP1099: u64 = 60_000;

/// Epoch length in force at `block`.
pub fn epoch_length(block: BlockNumber, ecip1099_block: Option<BlockNumber>) -> u64 {
    match ecip1099_block {
        Some(activation) if block >= activation => EPOCH_LENGTH_ECIP1099,
        _ => EPOCH_LENGTH_DEFAULT,
    }
}

/// Epoch containing `block` for the given epoch length.
pub fn calc_epoch(block: BlockNumber, epoch_length: u64) -> u64 {
    block / epoch_length
}

/// Identifies the artifact of one epoch under one epoch length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpochKey {
    pub epoch: u64,
    pub epoch_length: u64,
}

impl EpochKey {
    pub fn new(epoch: u64, epoch_length: u64) -> Self {
        Self {
            epoch,
            epoch_length,
        }
    }

    /// The key of the epoch containing `block`.
    pub fn for_block(block: BlockNumber, ecip1099_block: Option<BlockNumber>) -> Self {
        let epoch_length = epoch_length(block, ecip1099_block);
        Self::new(calc_epoch(block, epoch_length), epoch_length)
    }

    /// First block covered by this epoch.
    pub fn first_block(&self) -> BlockNumber {
        self.epoch.saturating_mul(self.epoch_length)
    }

    /// Index of the default-length epoch containing the first block.
    ///
    /// Cache and dataset sizes grow per 30 000 blocks whatever the epoch
    /// length, so an extended-length epoch is sized by this index.
    pub fn size_index(&self) -> u64 {
        self.first_block() / EPOCH_LENGTH_DEFAULT
    }

    /// The key of the following epoch.
    ///
    /// Crossing the ECIP-1099 activation switches to the extended length, in
    /// which case the epoch number is recomputed rather than incremented.
    pub fn next(&self, ecip1099_block: Option<BlockNumber>) -> Self {
        let block = self.epoch.saturating_add(1).saturating_mul(self.epoch_length);
        let epoch_length = epoch_length(block, ecip1099_block);
        if epoch_length == self.epoch_length {
            Self::new(self.epoch.saturating_add(1), epoch_length)
        } else {
            Self::new(calc_epoch(block, epoch_length), epoch_length)
        }
    }
}

impl fmt::Display for EpochKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.epoch, self.epoch_length)
    }
}
