//! Append-only usage log for draw results.
//!
//! Every successful draw may be recorded, best-effort, as a
//! delimiter-framed text entry: an ISO-8601 timestamp, the client
//! address, and the JSON-encoded roster and team assignments. Recording
//! never influences the draw result itself.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

const LOG_FILE: &str = "usage.log";
const DELIMITER: &str = "--------------------------------------------------";

/// One recorded draw.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub timestamp: DateTime<Utc>,
    pub client: String,
    pub players: Vec<String>,
    pub team_blue: Vec<String>,
    pub team_red: Vec<String>,
}

impl DrawRecord {
    /// Stamps a record with the current time.
    pub fn now(
        client: impl Into<String>,
        players: Vec<String>,
        team_blue: Vec<String>,
        team_red: Vec<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            client: client.into(),
            players,
            team_blue,
            team_red,
        }
    }
}

/// Handle on the append-only usage log.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Prepares the log directory and returns a handle on
    /// `<dir>/usage.log`.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(LOG_FILE),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file on first use.
    pub fn append(&self, record: &DrawRecord) -> io::Result<()> {
        let entry = render_entry(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

/// Appends an entry off the async runtime, fire-and-forget.
///
/// A failed append is logged and swallowed; it must never surface to the
/// caller that already holds its draw result.
pub fn append_detached(log: Arc<AuditLog>, record: DrawRecord) {
    tokio::task::spawn_blocking(move || {
        if let Err(err) = log.append(&record) {
            warn!(error = %err, path = %log.path().display(), "failed to append usage log entry");
        }
    });
}

fn render_entry(record: &DrawRecord) -> io::Result<String> {
    let players = serde_json::to_string(&record.players)?;
    let team_blue = serde_json::to_string(&record.team_blue)?;
    let team_red = serde_json::to_string(&record.team_red)?;
    let timestamp = record
        .timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    Ok(format!(
        "\n{DELIMITER}\n\
         Time: {timestamp}\n\
         IP: {client}\n\
         Input Players: {players}\n\
         Result:\n  Blue Team: {team_blue}\n  Red Team: {team_red}\n\
         {DELIMITER}\n",
        client = record.client,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_record() -> DrawRecord {
        DrawRecord::now(
            "127.0.0.1",
            vec!["Amy".into(), "Beth".into(), "Carl".into(), "Dan".into()],
            vec!["Amy".into(), "Carl".into()],
            vec!["Beth".into(), "Dan".into()],
        )
    }

    #[test]
    fn append_writes_a_delimited_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("logs")).unwrap();

        log.append(&sample_record()).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches(DELIMITER).count(), 2);
        assert!(contents.contains("Time: "));
        assert!(contents.contains("IP: 127.0.0.1"));
        assert!(contents.contains(r#"Input Players: ["Amy","Beth","Carl","Dan"]"#));
        assert!(contents.contains(r#"Blue Team: ["Amy","Carl"]"#));
        assert!(contents.contains(r#"Red Team: ["Beth","Dan"]"#));
    }

    #[test]
    fn timestamp_is_iso_8601_utc() {
        let record = sample_record();
        let entry = render_entry(&record).unwrap();

        let time_line = entry
            .lines()
            .find(|line| line.starts_with("Time: "))
            .unwrap();
        let stamp = time_line.trim_start_matches("Time: ");
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn entries_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path()).unwrap();

        log.append(&sample_record()).unwrap();
        log.append(&sample_record()).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches(DELIMITER).count(), 4);
        assert_eq!(contents.matches("Time: ").count(), 2);
    }
}
