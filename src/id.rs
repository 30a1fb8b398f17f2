//! ID generation for tasks.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix shared by every generated task id.
pub const ID_PREFIX: &str = "td-";

/// Random bits appended after the timestamp.
const ENTROPY_MASK: u64 = (1 << 40) - 1;

/// Generate a task id: "td-" + 11 hex chars of creation millis + 10 random hex chars.
///
/// The timestamp keeps ids roughly ordered by creation; the random tail keeps
/// ids created in the same millisecond apart.
pub fn generate_id(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().max(0) as u64;
    let entropy = rand::rng().random::<u64>() & ENTROPY_MASK;
    format!("{}{:011x}{:010x}", ID_PREFIX, millis, entropy)
}
