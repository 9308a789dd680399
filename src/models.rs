use std::collections::{HashMap, HashSet};

/// Per-user activity counters, keyed by normalized user name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub access_count: u32,
    pub submission_count: u32,
}

/// What one log row means for the report.
///
/// Enrollment is exclusive; an activity row may count as an access, a
/// submission, both, or neither (`Ignored`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Enrollment(String),
    Activity {
        actor: String,
        access: bool,
        submission: bool,
    },
    Ignored,
}

/// Aggregated outcome of one pass over the log: the course roster and the
/// reconciled per-user counters. Every key in `stats` is a member of
/// `enrolled`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participation {
    pub enrolled: HashSet<String>,
    pub stats: HashMap<String, UserStats>,
}
