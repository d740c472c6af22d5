#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use classic_lru::BasicLru;

#[derive(Arbitrary, Debug)]
enum Op {
    Add(u8, u16),
    Get(u8),
    Peek(u8),
    Remove(u8),
    RemoveOldest,
    Purge,
}

#[derive(Arbitrary, Debug)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

// Drive the LRU with arbitrary operation sequences and check its invariants
// after every step.
fuzz_target!(|input: Input| {
    let mut lru = BasicLru::new(input.capacity as usize);
    let capacity = lru.capacity();

    for op in input.ops {
        match op {
            Op::Add(key, value) => {
                let was_present = lru.contains(&key);
                let evicted = lru.add(key, value);
                assert!(!(was_present && evicted), "update must not evict");
                assert_eq!(lru.peek(&key), Some(&value));
                assert_eq!(lru.keys().first(), Some(&key));
            }
            Op::Get(key) => {
                if lru.get(&key).is_some() {
                    assert_eq!(lru.keys().first(), Some(&key));
                }
            }
            Op::Peek(key) => {
                let _ = lru.peek(&key);
            }
            Op::Remove(key) => {
                lru.remove(&key);
                assert!(!lru.contains(&key));
            }
            Op::RemoveOldest => {
                let oldest = lru.get_oldest().map(|(k, _)| *k);
                assert_eq!(lru.remove_oldest().map(|(k, _)| k), oldest);
            }
            Op::Purge => {
                lru.purge();
                assert!(lru.is_empty());
            }
        }
        assert!(lru.len() <= capacity);
        assert_eq!(lru.keys().len(), lru.len());
    }
});
