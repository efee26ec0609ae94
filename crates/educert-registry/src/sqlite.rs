// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate registry backed by SQLite.
//
// Each record is one row. Email matching goes through the `email_key`
// column (trimmed + Unicode-lowercased in Rust), because SQLite's own
// `lower()` only folds ASCII. Insertion order is the implicit rowid.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use educert_core::error::{EducertError, Result};
use educert_core::types::{CertificateId, CertificateRecord, ISSUE_DATE_FORMAT, email_key};

use crate::registry::CertificateRegistry;

/// SQLite schema for the certificates table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS certificates (
        id TEXT PRIMARY KEY,
        student_name TEXT NOT NULL,
        student_email TEXT NOT NULL,
        email_key TEXT NOT NULL,
        course_name TEXT NOT NULL,
        institution_name TEXT NOT NULL,
        issue_date TEXT NOT NULL,
        certificate_hash TEXT NOT NULL,
        ipfs_hash TEXT,
        is_verified INTEGER NOT NULL,
        transaction_hash TEXT,
        description TEXT,
        grade TEXT,
        duration TEXT,
        issued_at TEXT
    );
    CREATE INDEX IF NOT EXISTS certificates_email_key ON certificates(email_key);
"#;

const SELECT_COLUMNS: &str = "SELECT id, student_name, student_email, course_name,
        institution_name, issue_date, certificate_hash, ipfs_hash, is_verified,
        transaction_hash, description, grade, duration, issued_at
    FROM certificates";

/// Registry stored in a SQLite database.
///
/// All methods are synchronous because `rusqlite` does not support async
/// natively.
pub struct SqliteRegistry {
    conn: Connection,
}

impl SqliteRegistry {
    /// Open (or create) the registry database at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| EducertError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| EducertError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| EducertError::Database(format!("create table: {e}")))?;

        info!("certificate registry database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| EducertError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| EducertError::Database(format!("create table: {e}")))?;

        debug!("in-memory certificate registry opened");
        Ok(Self { conn })
    }

    fn query(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<CertificateRecord>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EducertError::Database(format!("prepare: {e}")))?;

        stmt.query_map(args, row_to_record)
            .map_err(|e| EducertError::Database(format!("query: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EducertError::Database(format!("collect rows: {e}")))
    }
}

impl CertificateRegistry for SqliteRegistry {
    #[instrument(skip(self, record), fields(id = %record.id))]
    fn append(&mut self, record: CertificateRecord) -> Result<CertificateId> {
        if self.find_by_id(&record.id)?.is_some() {
            return Err(EducertError::DuplicateId(record.id.to_string()));
        }

        self.conn
            .execute(
                "INSERT INTO certificates (id, student_name, student_email, email_key,
                 course_name, institution_name, issue_date, certificate_hash, ipfs_hash,
                 is_verified, transaction_hash, description, grade, duration, issued_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    record.id.as_str(),
                    record.student_name,
                    record.student_email,
                    email_key(&record.student_email),
                    record.course_name,
                    record.institution_name,
                    record.issue_date_str(),
                    record.certificate_hash,
                    record.ipfs_hash,
                    record.is_verified,
                    record.transaction_hash,
                    record.description,
                    record.grade,
                    record.duration,
                    record.issued_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| EducertError::Database(format!("insert certificate: {e}")))?;

        info!(id = %record.id, "certificate appended");
        Ok(record.id)
    }

    fn find_by_id(&self, id: &CertificateId) -> Result<Option<CertificateRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.as_str()], row_to_record)
            .optional()
            .map_err(|e| EducertError::Database(format!("find_by_id: {e}")))
    }

    fn find_by_email(&self, email: &str) -> Result<Vec<CertificateRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE email_key = ?1 ORDER BY rowid ASC");
        let records = self.query(&sql, params![email_key(email)])?;
        debug!(count = records.len(), "certificates found by email");
        Ok(records)
    }

    fn all(&self) -> Result<Vec<CertificateRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY rowid ASC");
        self.query(&sql, [])
    }

    fn len(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM certificates", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
            .map_err(|e| EducertError::Database(format!("count: {e}")))
    }

    fn recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY rowid DESC LIMIT ?1");
        self.query(&sql, params![limit as i64])
    }
}

fn conversion_failure(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

/// Map a `SELECT_COLUMNS` row back into a record.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CertificateRecord> {
    let id: String = row.get(0)?;
    let issue_date_str: String = row.get(5)?;
    let issued_at_str: Option<String> = row.get(13)?;

    let issue_date = NaiveDate::parse_from_str(&issue_date_str, ISSUE_DATE_FORMAT)
        .map_err(|e| conversion_failure(5, e))?;

    let issued_at = issued_at_str
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| conversion_failure(13, e))
        })
        .transpose()?;

    Ok(CertificateRecord {
        id: CertificateId::from(id),
        student_name: row.get(1)?,
        student_email: row.get(2)?,
        course_name: row.get(3)?,
        institution_name: row.get(4)?,
        issue_date,
        certificate_hash: row.get(6)?,
        ipfs_hash: row.get(7)?,
        is_verified: row.get(8)?,
        transaction_hash: row.get(9)?,
        description: row.get(10)?,
        grade: row.get(11)?,
        duration: row.get(12)?,
        issued_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::contract;

    fn mem() -> SqliteRegistry {
        SqliteRegistry::open_in_memory().expect("open in-memory db")
    }

    #[test]
    fn in_memory_contract() {
        contract::append_then_find(&mut mem());
        contract::missing_id_is_none(&mut mem());
        contract::email_lookup_ignores_case(&mut mem());
        contract::duplicate_id_rejected(&mut mem());
        contract::recent_is_newest_first(&mut mem());
    }

    #[test]
    fn reopen_restores_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certificates.db");

        let rec = contract::record("Jane Doe", "jane@x.com", "Intro");
        {
            let mut reg = SqliteRegistry::open(&path).unwrap();
            reg.append(rec.clone()).unwrap();
        }

        let reg = SqliteRegistry::open(&path).unwrap();
        assert_eq!(reg.len().unwrap(), 1);
        assert_eq!(reg.find_by_id(&rec.id).unwrap(), Some(rec));
    }

    #[test]
    fn unicode_email_folds() {
        let mut reg = mem();
        reg.append(contract::record("Ö", "ÖMER@x.com", "One")).unwrap();
        assert_eq!(reg.find_by_email("ömer@X.COM").unwrap().len(), 1);
    }

    #[test]
    fn optional_fields_round_trip() {
        let mut reg = mem();
        let mut rec = contract::record("Jane Doe", "jane@x.com", "Intro");
        rec.ipfs_hash = Some("QmAbc".into());
        rec.grade = Some("A".into());
        rec.issued_at = None;
        reg.append(rec.clone()).unwrap();
        assert_eq!(reg.find_by_id(&rec.id).unwrap(), Some(rec));
    }
}
