use std::collections::{HashMap, HashSet};
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::ReportError;
use crate::models::{EventKind, Participation, UserStats};

// Fixed column layout of the Moodle activity-log export. Field 0 is the
// event timestamp and fields 3-4 are context/component; none of them feed
// the report. Rows may carry extra trailing fields, which are ignored.
const COL_ACTOR: usize = 1;
const COL_AFFECTED: usize = 2;
const COL_EVENT: usize = 5;
const MIN_FIELDS: usize = 6;

// Event labels as Moodle emits them, byte-for-byte.
const ENROLLMENT_LABEL: &str = "Usuário inscrito no curso";
const SUBMISSION_LABELS: [&str; 2] = [
    "Um envio foi submetido.",
    "Tentativa do questionário entregue",
];

// Actor value Moodle writes for system-generated events; never an access.
const ACTOR_PLACEHOLDER: &str = "-";

/// Folds an exported activity log into the course roster and per-user
/// counters, then drops activity from anyone who was never enrolled.
///
/// Single pass over `input`; the first record is the export header and is
/// discarded unconditionally. Any structural problem (no header, a row with
/// fewer than six fields, undecodable bytes) aborts the whole aggregation.
pub fn participation_stats(input: impl Read) -> Result<Participation, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.records();
    match records.next() {
        None => return Err(ReportError::EmptyLog),
        Some(header) => {
            header?;
        }
    }

    let mut enrolled: HashSet<String> = HashSet::new();
    let mut stats: HashMap<String, UserStats> = HashMap::new();

    for (idx, result) in records.enumerate() {
        let record = result?;
        if record.len() < MIN_FIELDS {
            return Err(ReportError::ShortRow {
                record: idx as u64 + 2,
                fields: record.len(),
            });
        }

        match classify(&record) {
            EventKind::Enrollment(name) => {
                enrolled.insert(name);
            }
            EventKind::Activity {
                actor,
                access,
                submission,
            } => {
                let entry = stats.entry(actor).or_default();
                if access {
                    entry.access_count += 1;
                }
                if submission {
                    entry.submission_count += 1;
                }
            }
            EventKind::Ignored => {}
        }
    }

    // Spy removal: activity recorded for a name that never appears in an
    // enrollment row must not reach the report.
    stats.retain(|name, _| enrolled.contains(name));

    debug!(
        enrolled = enrolled.len(),
        active = stats.len(),
        "aggregated participation log"
    );

    Ok(Participation { enrolled, stats })
}

/// Classifies one data row. Enrollment wins outright; otherwise the access
/// and submission checks run independently, so a single row can count as
/// both.
fn classify(record: &StringRecord) -> EventKind {
    let event = &record[COL_EVENT];

    if event == ENROLLMENT_LABEL {
        return EventKind::Enrollment(record[COL_AFFECTED].to_uppercase());
    }

    let actor = &record[COL_ACTOR];
    let access = actor != ACTOR_PLACEHOLDER;
    let submission = SUBMISSION_LABELS.contains(&event);

    if !access && !submission {
        return EventKind::Ignored;
    }

    EventKind::Activity {
        actor: actor.to_uppercase(),
        access,
        submission,
    }
}
