// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate integrity — SHA-256 fingerprints over certificate fields and
// attachment bytes.

use educert_core::error::EducertError;
use educert_core::types::CertificateRecord;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Verify that `data` matches the expected SHA-256 hex digest.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), EducertError> {
    let actual = hash_bytes(data);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(EducertError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// Fingerprint a certificate's identifying fields.
///
/// The fields are concatenated in this fixed order with no separator and
/// hashed with SHA-256. Certificates issued by earlier portal versions used
/// the same construction, so their stored hashes still recompute.
/// `issue_date` must already be rendered as `YYYY-MM-DD`.
pub fn certificate_digest(
    student_name: &str,
    student_email: &str,
    course_name: &str,
    institution_name: &str,
    issue_date: &str,
) -> String {
    let mut hasher = Sha256::new();
    for field in [student_name, student_email, course_name, institution_name, issue_date] {
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Recompute a stored record's digest and compare it with `certificate_hash`.
///
/// Registry verification is a lookup by id; this is the stronger check that
/// catches records whose fields were edited after issuance.
pub fn verify_record_digest(record: &CertificateRecord) -> Result<(), EducertError> {
    let actual = certificate_digest(
        &record.student_name,
        &record.student_email,
        &record.course_name,
        &record.institution_name,
        &record.issue_date_str(),
    );
    if actual == record.certificate_hash {
        Ok(())
    } else {
        Err(EducertError::IntegrityMismatch {
            expected: record.certificate_hash.clone(),
            actual,
        })
    }
}
