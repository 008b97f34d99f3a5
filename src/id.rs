//! Task ID generation utilities.
//!
//! Task IDs are the creation timestamp in hex milliseconds plus an
//! 8-character hex suffix built from a process-wide sequence counter and
//! random bits. The counter keeps ids distinct even when two tasks are
//! created in the same millisecond; the store re-checks for collisions on
//! insert as a backstop against ids loaded from older data.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Process-wide sequence counter mixed into every id.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Global counter for deterministic ID generation in tests.
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Enable deterministic ID generation for testing.
///
/// When enabled, IDs use a counter instead of timestamp and random hex.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_COUNTER.store(0, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Generate 16 random bits.
#[allow(clippy::cast_possible_truncation)]
fn random_bits() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    // Truncation is intentional - we only need entropy, not precision
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    );
    hasher.finish() & 0xFFFF
}

/// Generate a task ID.
///
/// The ID is the current time in hex milliseconds, a 4-hex-digit slice of
/// the sequence counter, and 4 random hex digits, e.g. `18f2a40d2b1-00077c3e`.
#[must_use]
pub fn generate_task_id() -> String {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        return format!("task-{count:08x}");
    }

    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    format!("{millis:x}-{seq:04x}{:04x}", random_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_deterministic_ids_count_up() {
        enable_deterministic_ids();

        assert_eq!(generate_task_id(), "task-00000000");
        assert_eq!(generate_task_id(), "task-00000001");
        assert_eq!(generate_task_id(), "task-00000002");

        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_random_ids_have_timestamp_and_suffix() {
        let id = generate_task_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(u128::from_str_radix(millis, 16).is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    #[serial]
    fn test_ids_distinct_within_same_millisecond() {
        let mut ids: Vec<String> = (0..1000).map(|_| generate_task_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }
}
