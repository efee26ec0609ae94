// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the EduCert certificate engine.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EducertError, Result};

/// Calendar format used for issue dates everywhere (storage, digest, CLI).
pub const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `len` characters drawn uniformly from `[0-9a-z]`.
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Unique identifier for an issued certificate.
///
/// Generated ids look like `cert_1718000000000_k3j9x0a2b`: the issuing
/// time in Unix milliseconds followed by nine random base36 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(String);

impl CertificateId {
    /// Generate a fresh id stamped with `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("cert_{}_{}", now.timestamp_millis(), random_base36(9)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CertificateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CertificateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalised key used for case-insensitive e-mail matching.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Untrusted issuance input, exactly as an institution submitted it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub student_name: String,
    pub student_email: String,
    pub course_name: String,
    pub institution_name: String,
    /// `YYYY-MM-DD`.
    pub issue_date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// An [`IssueRequest`] that passed validation: fields trimmed, date parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIssue {
    pub student_name: String,
    pub student_email: String,
    pub course_name: String,
    pub institution_name: String,
    pub issue_date: NaiveDate,
    pub description: Option<String>,
    pub grade: Option<String>,
    pub duration: Option<String>,
}

impl ValidatedIssue {
    /// Issue date rendered as `YYYY-MM-DD`.
    pub fn issue_date_str(&self) -> String {
        self.issue_date.format(ISSUE_DATE_FORMAT).to_string()
    }
}

impl IssueRequest {
    /// Check every required field and parse the issue date.
    ///
    /// Reports all missing fields at once so the caller can fix them in a
    /// single pass.
    pub fn validate(&self) -> Result<ValidatedIssue> {
        let required = [
            ("student name", &self.student_name),
            ("student email", &self.student_email),
            ("course name", &self.course_name),
            ("institution name", &self.institution_name),
            ("issue date", &self.issue_date),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(EducertError::ValidationFailed(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let email = self.student_email.trim();
        if !email.contains('@') {
            return Err(EducertError::ValidationFailed(format!(
                "student email '{email}' is not an e-mail address"
            )));
        }

        let date = self.issue_date.trim();
        let issue_date = NaiveDate::parse_from_str(date, ISSUE_DATE_FORMAT).map_err(|_| {
            EducertError::ValidationFailed(format!("issue date '{date}' is not YYYY-MM-DD"))
        })?;

        Ok(ValidatedIssue {
            student_name: self.student_name.trim().to_owned(),
            student_email: email.to_owned(),
            course_name: self.course_name.trim().to_owned(),
            institution_name: self.institution_name.trim().to_owned(),
            issue_date,
            description: non_blank(&self.description),
            grade: non_blank(&self.grade),
            duration: non_blank(&self.duration),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// One issued certificate. Immutable once appended to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub id: CertificateId,
    pub student_name: String,
    pub student_email: String,
    pub course_name: String,
    pub institution_name: String,
    pub issue_date: NaiveDate,
    /// SHA-256 digest over the identifying fields.
    pub certificate_hash: String,
    /// Content-store reference for uploaded attachments, if any.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub ipfs_hash: Option<String>,
    pub is_verified: bool,
    /// Ledger reference returned when the digest was anchored.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub duration: Option<String>,
    /// When the record was appended. Absent on records imported from the
    /// web portal, which only kept the time inside the id.
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

/// The web portal stored `""` for optional fields left empty.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl CertificateRecord {
    /// Build a freshly issued record. `is_verified` is always set.
    pub fn new(
        id: CertificateId,
        issue: ValidatedIssue,
        certificate_hash: String,
        ipfs_hash: Option<String>,
        transaction_hash: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_name: issue.student_name,
            student_email: issue.student_email,
            course_name: issue.course_name,
            institution_name: issue.institution_name,
            issue_date: issue.issue_date,
            certificate_hash,
            ipfs_hash,
            is_verified: true,
            transaction_hash,
            description: issue.description,
            grade: issue.grade,
            duration: issue.duration,
            issued_at: Some(issued_at),
        }
    }

    /// Issue date rendered as `YYYY-MM-DD`.
    pub fn issue_date_str(&self) -> String {
        self.issue_date.format(ISSUE_DATE_FORMAT).to_string()
    }
}

/// Ordering applied to a student's certificate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Issue date, newest first.
    #[default]
    Date,
    /// Course name, alphabetical.
    Course,
    /// Institution name, alphabetical.
    Institution,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "course" | "name" => Ok(Self::Course),
            "institution" => Ok(Self::Institution),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// Filter and ordering for a student's portfolio.
#[derive(Debug, Clone, Default)]
pub struct PortfolioQuery {
    /// Case-insensitive substring matched against course or institution.
    pub search: Option<String>,
    pub sort: SortKey,
}

/// Registry-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total: usize,
    pub verified: usize,
    pub institutions: usize,
}

/// Counters over one student's certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total: usize,
    pub verified: usize,
    /// Certificates whose issue date falls in the current calendar year.
    pub this_year: usize,
    pub institutions: usize,
}
