// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal rendering of certificates, counters and audit entries.

use std::fmt::Write as _;

use educert_core::human_errors::HumanError;
use educert_core::types::{CertificateRecord, PortfolioStats, RegistryStats};
use educert_security::audit::AuditEntry;

/// Full detail view of one certificate.
pub fn certificate(record: &CertificateRecord, verify_url: &str) -> String {
    let mut out = String::new();
    let status = if record.is_verified {
        "Certificate Verified"
    } else {
        "Verification Failed"
    };
    let _ = writeln!(out, "{status}");
    let _ = writeln!(out, "  ID:           {}", record.id);
    let _ = writeln!(out, "  Student:      {} <{}>", record.student_name, record.student_email);
    let _ = writeln!(out, "  Course:       {}", record.course_name);
    let _ = writeln!(out, "  Institution:  {}", record.institution_name);
    let _ = writeln!(out, "  Issue date:   {}", record.issue_date_str());
    for (label, value) in [
        ("Grade", &record.grade),
        ("Duration", &record.duration),
        ("Description", &record.description),
    ] {
        if let Some(v) = value {
            let _ = writeln!(out, "  {:<13} {v}", format!("{label}:"));
        }
    }
    let _ = writeln!(out, "  Digest:       {}", record.certificate_hash);
    if let Some(ipfs) = &record.ipfs_hash {
        let _ = writeln!(out, "  Content ref:  {ipfs}");
    }
    if let Some(tx) = &record.transaction_hash {
        let _ = writeln!(out, "  Transaction:  {tx}");
    }
    let _ = write!(out, "  Verify at:    {verify_url}");
    out
}

/// One line per certificate.
pub fn certificate_list(records: &[CertificateRecord]) -> String {
    if records.is_empty() {
        return "No certificates found.".into();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{}  {}  {} — {} ({})",
                r.id,
                r.issue_date_str(),
                r.course_name,
                r.institution_name,
                r.student_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn registry_stats(stats: &RegistryStats) -> String {
    format!(
        "Total certificates:     {}\nVerified certificates:  {}\nInstitutions:           {}",
        stats.total, stats.verified, stats.institutions
    )
}

pub fn portfolio_stats(stats: &PortfolioStats) -> String {
    format!(
        "Total certificates:     {}\nVerified certificates:  {}\nThis year:              {}\nInstitutions:           {}",
        stats.total, stats.verified, stats.this_year, stats.institutions
    )
}

pub fn audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries.".into();
    }
    entries
        .iter()
        .map(|e| {
            let outcome = if e.success { "ok  " } else { "FAIL" };
            match &e.details {
                Some(d) => format!("{}  {outcome}  {:<6}  {}  {d}", e.timestamp, e.action, e.subject),
                None => format!("{}  {outcome}  {:<6}  {}", e.timestamp, e.action, e.subject),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn human_error(err: &HumanError) -> String {
    format!("error: {}\n  {}", err.message, err.suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use educert_core::types::{CertificateId, IssueRequest};

    fn jane() -> CertificateRecord {
        let issue = IssueRequest {
            student_name: "Jane Doe".into(),
            student_email: "jane@x.com".into(),
            course_name: "Intro".into(),
            institution_name: "Acme U".into(),
            issue_date: "2024-01-01".into(),
            grade: Some("A".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        CertificateRecord::new(
            CertificateId::from("cert_1_abc"),
            issue,
            "ff".repeat(32),
            None,
            Some("0x01".into()),
            Utc::now(),
        )
    }

    #[test]
    fn detail_view_shows_optional_fields_only_when_present() {
        let text = certificate(&jane(), "http://x/verify/cert_1_abc");
        assert!(text.starts_with("Certificate Verified"));
        assert!(text.contains("Grade:        A"));
        assert!(!text.contains("Duration"));
        assert!(!text.contains("Content ref"));
        assert!(text.contains("Transaction:  0x01"));
    }

    #[test]
    fn empty_list_message() {
        assert_eq!(certificate_list(&[]), "No certificates found.");
        assert!(certificate_list(&[jane()]).contains("cert_1_abc  2024-01-01  Intro"));
    }
}
