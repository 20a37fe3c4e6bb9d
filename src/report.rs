//! Status dump sink.
//!
//! Appends one record per call describing the cache's current ordering, for
//! post-hoc analysis. The sink is best-effort: an unopenable path or a
//! failed write is silently ignored, since the dump is an observability
//! surface, not a correctness one.
//!
//! Formats:
//!
//! - FIFO/LRU: `k1,k2,…,kn,` followed by a newline, keys in recency order
//!   (most recent first).
//! - LFU: `c: k1, k2, …, kn, ` followed by a newline per non-empty
//!   frequency bucket, then one extra blank line per call.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::traits::Key;

/// Appends one comma-separated recency line (most recent first).
pub fn append_recency_line<I>(path: &Path, keys: I)
where
    I: IntoIterator<Item = Key>,
{
    let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) else {
        return;
    };
    let mut line = String::new();
    for key in keys {
        line.push_str(&key.to_string());
        line.push(',');
    }
    line.push('\n');
    let _ = file.write_all(line.as_bytes());
}

/// Appends one `count: keys` line per bucket plus a trailing blank line.
pub fn append_frequency_lines<I, K>(path: &Path, buckets: I)
where
    I: IntoIterator<Item = (u64, K)>,
    K: IntoIterator<Item = Key>,
{
    let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) else {
        return;
    };
    let mut out = String::new();
    for (freq, keys) in buckets {
        out.push_str(&freq.to_string());
        out.push_str(": ");
        for key in keys {
            out.push_str(&key.to_string());
            out.push_str(", ");
        }
        out.push('\n');
    }
    out.push('\n');
    let _ = file.write_all(out.as_bytes());
}
