// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Audit trail — append-only SQLite log of every issuance and verification
// attempt, successful or not.
//
// Schema:
//   audit_log(
//     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//     timestamp  TEXT    NOT NULL,   -- RFC 3339
//     action     TEXT    NOT NULL,   -- "issue", "verify", "check"
//     subject    TEXT    NOT NULL,   -- certificate id, or student e-mail for a rejected issue
//     success    INTEGER NOT NULL,   -- 0 = failure, 1 = success
//     details    TEXT                -- optional free-form context
//   )

use std::path::Path;

use chrono::Utc;
use educert_core::error::EducertError;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS audit_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp  TEXT    NOT NULL,
    action     TEXT    NOT NULL,
    subject    TEXT    NOT NULL,
    success    INTEGER NOT NULL,
    details    TEXT
);
CREATE INDEX IF NOT EXISTS audit_log_subject ON audit_log(subject);";

fn db_err(e: rusqlite::Error) -> EducertError {
    EducertError::Database(e.to_string())
}

/// What was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A certificate was issued (or issuance was rejected).
    Issue,
    /// A certificate id was looked up.
    Verify,
    /// A stored record's digest was recomputed.
    Check,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Verify => "verify",
            Self::Check => "check",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the audit log, used for queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub subject: String,
    pub success: bool,
    pub details: Option<String>,
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        action: row.get(2)?,
        subject: row.get(3)?,
        success: row.get::<_, i32>(4)? != 0,
        details: row.get(5)?,
    })
}

/// Append-only audit log backed by a SQLite database.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EducertError> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("audit log opened");
        Ok(Self { conn })
    }

    /// Open an in-memory audit database (useful for tests).
    pub fn open_in_memory() -> Result<Self, EducertError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory audit log opened");
        Ok(Self { conn })
    }

    /// Record a new audit entry.
    #[instrument(skip(self, details), fields(%action, %subject, success))]
    pub fn record(
        &self,
        action: AuditAction,
        subject: &str,
        success: bool,
        details: Option<&str>,
    ) -> Result<(), EducertError> {
        let timestamp = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO audit_log (timestamp, action, subject, success, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![timestamp, action.as_str(), subject, success as i32, details],
            )
            .map_err(db_err)?;

        debug!("audit entry recorded");
        Ok(())
    }

    /// All entries about `subject`, oldest first.
    pub fn entries_for(&self, subject: &str) -> Result<Vec<AuditEntry>, EducertError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, action, subject, success, details
                 FROM audit_log
                 WHERE subject = ?1
                 ORDER BY id ASC",
            )
            .map_err(db_err)?;

        stmt.query_map(params![subject], row_to_entry)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)
    }

    /// Retrieve the most recent `limit` entries, newest first.
    pub fn recent_entries(&self, limit: u32) -> Result<Vec<AuditEntry>, EducertError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, action, subject, success, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(db_err)?;

        stmt.query_map(params![limit], row_to_entry)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)
    }

    /// Return the total number of entries in the audit log.
    pub fn count(&self) -> Result<u64, EducertError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_log() -> AuditLog {
        AuditLog::open_in_memory().expect("open in-memory audit log")
    }

    #[test]
    fn record_and_count() {
        let log = make_log();
        assert_eq!(log.count().unwrap(), 0);

        log.record(AuditAction::Issue, "cert_1_a", true, None).unwrap();
        log.record(AuditAction::Verify, "cert_1_a", true, Some("cli"))
            .unwrap();

        assert_eq!(log.count().unwrap(), 2);
    }

    #[test]
    fn entries_for_subject() {
        let log = make_log();
        log.record(AuditAction::Issue, "cert_1_a", true, None).unwrap();
        log.record(AuditAction::Verify, "cert_2_b", true, None).unwrap();
        log.record(AuditAction::Check, "cert_1_a", false, Some("digest mismatch"))
            .unwrap();

        let entries = log.entries_for("cert_1_a").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "issue");
        assert!(entries[0].success);
        assert_eq!(entries[1].action, "check");
        assert!(!entries[1].success);
        assert_eq!(entries[1].details.as_deref(), Some("digest mismatch"));
    }

    #[test]
    fn recent_entries_newest_first() {
        let log = make_log();
        for i in 0..5 {
            log.record(AuditAction::Verify, &format!("cert_{i}_x"), i % 2 == 0, None)
                .unwrap();
        }

        let recent = log.recent_entries(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].subject, "cert_4_x");
        assert!(recent[0].id > recent[1].id);
        assert!(recent[1].id > recent[2].id);
    }

    #[test]
    fn file_backed_log_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.db");
        {
            let log = AuditLog::open(&path).unwrap();
            log.record(AuditAction::Issue, "cert_9_z", true, None).unwrap();
        }
        let log = AuditLog::open(&path).unwrap();
        assert_eq!(log.count().unwrap(), 1);
    }
}
