pub mod commands;
pub mod editor;
pub mod format;
pub mod reducer;
pub mod store;

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Id for client-created entities (routines, steps, error notices):
/// timestamp plus a process-local sequence so ids stay unique even within
/// one clock tick.
pub(crate) fn next_id(prefix: &str) -> String {
    let sequence = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{sequence}", Utc::now().timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::next_id;

    #[test]
    fn next_id_is_unique_and_prefixed() {
        let first = next_id("step");
        let second = next_id("step");
        assert!(first.starts_with("step-"));
        assert_ne!(first, second);
    }
}
