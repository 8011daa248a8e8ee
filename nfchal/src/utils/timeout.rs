// nfchal/src/utils/timeout.rs
//! Millisecond deadline arithmetic on a monotonic tick counter.

use crate::constants::EVENT_WAIT_FOREVER;

/// Absolute deadline for `timeout_ms` from `now_ms`. `None` waits forever.
pub fn deadline_after(now_ms: u64, timeout_ms: u32) -> Option<u64> {
    (timeout_ms != EVENT_WAIT_FOREVER).then(|| now_ms + timeout_ms as u64)
}

/// Time left until `deadline`, `None` once it passed. An infinite deadline
/// yields [`EVENT_WAIT_FOREVER`]; finite ones never do.
pub fn remaining_ms(now_ms: u64, deadline: Option<u64>) -> Option<u32> {
    match deadline {
        None => Some(EVENT_WAIT_FOREVER),
        Some(d) if now_ms < d => Some((d - now_ms).min(EVENT_WAIT_FOREVER as u64 - 1) as u32),
        Some(_) => None,
    }
}
