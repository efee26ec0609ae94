// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The registry contract shared by every storage backend.

use educert_core::error::Result;
use educert_core::types::{CertificateId, CertificateRecord};

/// Append-only store of issued certificates.
///
/// Records are never updated or removed once appended. A lookup miss is
/// `Ok(None)` / an empty vector, never an error; `Err` is reserved for
/// storage failures and for a duplicate id on `append`.
pub trait CertificateRegistry {
    /// Store `record` and return its id.
    ///
    /// Fails with `EducertError::DuplicateId` if the id is already present,
    /// leaving the registry unchanged.
    fn append(&mut self, record: CertificateRecord) -> Result<CertificateId>;

    /// Exact-match lookup by id.
    fn find_by_id(&self, id: &CertificateId) -> Result<Option<CertificateRecord>>;

    /// All records whose student e-mail matches `email` ignoring case, in
    /// insertion order.
    fn find_by_email(&self, email: &str) -> Result<Vec<CertificateRecord>>;

    /// Every record, in insertion order.
    fn all(&self) -> Result<Vec<CertificateRecord>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The last `limit` records appended, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        let mut all = self.all()?;
        let start = all.len().saturating_sub(limit);
        let mut tail = all.split_off(start);
        tail.reverse();
        Ok(tail)
    }
}

impl<T: CertificateRegistry + ?Sized> CertificateRegistry for Box<T> {
    fn append(&mut self, record: CertificateRecord) -> Result<CertificateId> {
        (**self).append(record)
    }
    fn find_by_id(&self, id: &CertificateId) -> Result<Option<CertificateRecord>> {
        (**self).find_by_id(id)
    }
    fn find_by_email(&self, email: &str) -> Result<Vec<CertificateRecord>> {
        (**self).find_by_email(email)
    }
    fn all(&self) -> Result<Vec<CertificateRecord>> {
        (**self).all()
    }
    fn len(&self) -> Result<usize> {
        (**self).len()
    }
    fn recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        (**self).recent(limit)
    }
}

/// Behavioural checks run against every backend.
#[cfg(test)]
pub(crate) mod contract {
    use chrono::Utc;
    use educert_core::error::EducertError;
    use educert_core::types::{CertificateId, CertificateRecord, IssueRequest};

    use super::CertificateRegistry;

    pub fn record(name: &str, email: &str, course: &str) -> CertificateRecord {
        let issue = IssueRequest {
            student_name: name.into(),
            student_email: email.into(),
            course_name: course.into(),
            institution_name: "Acme U".into(),
            issue_date: "2024-01-01".into(),
            ..Default::default()
        }
        .validate()
        .expect("valid request");
        let now = Utc::now();
        CertificateRecord::new(
            CertificateId::generate(now),
            issue,
            "0".repeat(64),
            None,
            Some("0xfeed".into()),
            now,
        )
    }

    pub fn append_then_find(reg: &mut impl CertificateRegistry) {
        let rec = record("Jane Doe", "jane@x.com", "Intro");
        let id = reg.append(rec.clone()).unwrap();
        assert_eq!(id, rec.id);
        assert_eq!(reg.find_by_id(&id).unwrap(), Some(rec));
        assert_eq!(reg.len().unwrap(), 1);
    }

    pub fn missing_id_is_none(reg: &mut impl CertificateRegistry) {
        assert_eq!(reg.find_by_id(&CertificateId::from("cert_0_nothing")).unwrap(), None);
    }

    pub fn email_lookup_ignores_case(reg: &mut impl CertificateRegistry) {
        reg.append(record("Al", "A@B.com", "One")).unwrap();
        reg.append(record("Bo", "bo@c.org", "Two")).unwrap();
        reg.append(record("Al", "a@b.COM", "Three")).unwrap();

        let upper = reg.find_by_email("A@B.com").unwrap();
        let lower = reg.find_by_email("a@b.com").unwrap();
        assert_eq!(upper, lower);
        let courses: Vec<&str> = lower.iter().map(|r| r.course_name.as_str()).collect();
        assert_eq!(courses, ["One", "Three"]);
        assert!(reg.find_by_email("nobody@x.com").unwrap().is_empty());
    }

    pub fn duplicate_id_rejected(reg: &mut impl CertificateRegistry) {
        let rec = record("Jane Doe", "jane@x.com", "Intro");
        reg.append(rec.clone()).unwrap();

        let mut clash = record("Other", "other@x.com", "Else");
        clash.id = rec.id.clone();
        match reg.append(clash) {
            Err(EducertError::DuplicateId(id)) => assert_eq!(id, rec.id.to_string()),
            other => panic!("expected DuplicateId, got {other:?}"),
        }
        assert_eq!(reg.len().unwrap(), 1);
        assert_eq!(reg.find_by_id(&rec.id).unwrap(), Some(rec));
    }

    pub fn recent_is_newest_first(reg: &mut impl CertificateRegistry) {
        for course in ["c1", "c2", "c3", "c4"] {
            reg.append(record("S", "s@x.com", course)).unwrap();
        }
        let recent: Vec<String> = reg
            .recent(3)
            .unwrap()
            .into_iter()
            .map(|r| r.course_name)
            .collect();
        assert_eq!(recent, ["c4", "c3", "c2"]);
        assert_eq!(reg.recent(10).unwrap().len(), 4);
    }
}
