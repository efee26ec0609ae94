// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for registrars, students and verifiers.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the CLI reports the failure and which exit code it uses.

use crate::error::EducertError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary problem — running the same command again may work.
    Transient,
    /// The user must change their input (fill in a field, fix an id).
    ActionRequired,
    /// Cannot be fixed by retrying or by changing the input.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the command again could succeed unchanged.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `EducertError` into a `HumanError`.
pub fn humanize_error(err: &EducertError) -> HumanError {
    match err {
        // -- Registry errors --
        EducertError::NotFound(id) => HumanError {
            message: "Certificate not found or invalid.".into(),
            suggestion: format!(
                "Check the certificate ID and try again. IDs look like cert_1718000000000_k3j9x0a2b. (Looked up: {id})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EducertError::ValidationFailed(detail) => HumanError {
            message: "Please fill in all required fields.".into(),
            suggestion: format!("Correct the certificate details and issue it again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EducertError::DuplicateId(_) => HumanError {
            message: "A certificate with this ID already exists.".into(),
            suggestion: "Issue the certificate again; a new ID will be generated.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Integrity --
        EducertError::IntegrityMismatch { .. } => HumanError {
            message: "This certificate's details don't match its fingerprint.".into(),
            suggestion: "The stored record may have been altered after it was issued. Contact the issuing institution.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- External services --
        EducertError::Ledger(detail) => HumanError {
            message: "The certificate could not be recorded on the ledger.".into(),
            suggestion: format!("Nothing was issued. Try again in a moment. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        EducertError::ContentStore(detail) => HumanError {
            message: "The attached files could not be uploaded.".into(),
            suggestion: format!("Nothing was issued. Check the attachments and try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        EducertError::Database(_) => HumanError {
            message: "The certificate registry had a problem.".into(),
            suggestion: "Try again. Certificates issued earlier are still stored.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EducertError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "EduCert doesn't have permission to use that file.".into(),
                    suggestion: "Check the permissions of the data directory, or pass a different one with --data-dir.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        EducertError::Serialization(_) => HumanError {
            message: "The stored certificate data couldn't be read.".into(),
            suggestion: "The registry file may be damaged. Restore it from a backup, or report the problem.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
