use thiserror::Error;

/// Errors surfaced while turning an activity log into a report.
///
/// The aggregation core never recovers from these; callers decide how to
/// present them (the CLI prints and exits, the web adapter renders them
/// into the page).
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input had no header row to discard.
    #[error("empty log: no header row to discard")]
    EmptyLog,

    /// A data row carried fewer than the six required fields.
    #[error("row {record} has {fields} fields, expected at least 6")]
    ShortRow { record: u64, fields: usize },

    /// The input bytes are not decodable as UTF-8 text.
    #[error("input is not valid UTF-8 text (row {record})")]
    Encoding { record: u64 },

    /// The input stream could not be read.
    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),

    /// Any other structural problem reported by the CSV reader.
    #[error("malformed log: {0}")]
    Malformed(String),
}

impl ReportError {
    /// Process exit code for the CLI boundary. Distinct per error family so
    /// callers can tell malformed input, bad encoding, and I/O failure apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::EmptyLog
            | ReportError::ShortRow { .. }
            | ReportError::Malformed(_) => 65,
            ReportError::Encoding { .. } => 66,
            ReportError::Io(_) => 74,
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ReportError::Io(io),
            csv::ErrorKind::Utf8 { pos, .. } => ReportError::Encoding {
                record: pos.map_or(0, |p| p.line()),
            },
            kind => ReportError::Malformed(format!("{kind:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_log() {
        let msg = ReportError::EmptyLog.to_string();
        assert_eq!(msg, "empty log: no header row to discard");
    }

    #[test]
    fn display_short_row() {
        let err = ReportError::ShortRow {
            record: 4,
            fields: 3,
        };
        assert_eq!(err.to_string(), "row 4 has 3 fields, expected at least 6");
    }

    #[test]
    fn exit_codes_are_distinct_per_family() {
        let malformed = ReportError::ShortRow {
            record: 2,
            fields: 1,
        };
        let encoding = ReportError::Encoding { record: 2 };
        let io = ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe",
        ));

        assert_eq!(malformed.exit_code(), ReportError::EmptyLog.exit_code());
        assert_ne!(malformed.exit_code(), encoding.exit_code());
        assert_ne!(encoding.exit_code(), io.exit_code());
    }

    #[test]
    fn io_errors_convert_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("no such file"));
    }
}
