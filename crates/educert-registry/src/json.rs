// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON-file registry.
//
// The whole registry is one JSON array of camelCase records, the same shape
// the web portal kept in browser storage, so an exported array can be
// dropped in as `certificates.json`. The array is held in memory and the
// file is rewritten (temp file + rename) after every append.

use std::path::{Path, PathBuf};

use educert_core::error::{EducertError, Result};
use educert_core::types::{CertificateId, CertificateRecord, email_key};
use tracing::{debug, info, instrument};

use crate::registry::CertificateRegistry;

/// Registry backed by a JSON array, optionally persisted to a file.
pub struct JsonRegistry {
    records: Vec<CertificateRecord>,
    /// `None` for a purely in-memory registry.
    path: Option<PathBuf>,
}

impl JsonRegistry {
    /// Open (or create) the registry file at `path`.
    ///
    /// A missing or empty file is an empty registry. The file is not
    /// created until the first append.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match std::fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => Vec::new(),
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(count = records.len(), "json registry opened");
        Ok(Self {
            records,
            path: Some(path),
        })
    }

    /// A registry that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            path: None,
        }
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.records)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "registry file written");
        Ok(())
    }
}

impl CertificateRegistry for JsonRegistry {
    #[instrument(skip(self, record), fields(id = %record.id))]
    fn append(&mut self, record: CertificateRecord) -> Result<CertificateId> {
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(EducertError::DuplicateId(record.id.to_string()));
        }

        let id = record.id.clone();
        self.records.push(record);
        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement: the append did not happen.
            self.records.pop();
            return Err(e);
        }

        info!(%id, "certificate appended");
        Ok(id)
    }

    fn find_by_id(&self, id: &CertificateId) -> Result<Option<CertificateRecord>> {
        Ok(self.records.iter().find(|r| &r.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Vec<CertificateRecord>> {
        let key = email_key(email);
        Ok(self
            .records
            .iter()
            .filter(|r| email_key(&r.student_email) == key)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<CertificateRecord>> {
        Ok(self.records.clone())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
