#![no_main]

use libfuzzer_sys::fuzz_target;

use classic_ethash::EpochKey;

// Epoch arithmetic must never panic and the next key must never start
// before the current one, even at the top of the block range.
fuzz_target!(|data: (u64, Option<u64>)| {
    let (block, activation) = data;
    let key = EpochKey::for_block(block, activation);
    assert!(key.first_block() <= block);
    let next = key.next(activation);
    assert!(next.first_block() >= key.first_block());
});
