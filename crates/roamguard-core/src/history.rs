// ── Diagnostic history ──
//
// A bounded ring buffer of snapshot lines for entries that left (or
// entered) the blocklist. Diagnostics only: nothing in the engine reads
// it back for control decisions.

use std::collections::VecDeque;

use chrono::{TimeZone, Utc};

use crate::model::BssidStatus;

/// Fixed-capacity history of blocklist transitions, oldest evicted first.
#[derive(Debug)]
pub struct BlocklistHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl BlocklistHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a snapshot of `status` with the trigger that removed or
    /// blocked it. No-op unless the status is actually in the blocklist.
    pub fn add(&mut self, status: &BssidStatus, trigger: &str, now_ms: i64) {
        if !status.is_blocked() {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries
            .push_back(format!("{} trigger={trigger} {status}", format_ts(now_ms)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

fn format_ts(now_ms: i64) -> String {
    Utc.timestamp_millis_opt(now_ms)
        .single()
        .map_or_else(|| format!("@{now_ms}ms"), |ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
}
