// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filtering, ordering, and counters over certificate lists.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use educert_core::types::{CertificateRecord, PortfolioQuery, PortfolioStats, RegistryStats, SortKey};

/// Apply `query` to a student's certificates.
///
/// The search term matches course or institution name, ignoring case. Ties
/// keep their registry order.
pub fn apply_query(records: Vec<CertificateRecord>, query: &PortfolioQuery) -> Vec<CertificateRecord> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut out: Vec<CertificateRecord> = match needle {
        Some(n) => records
            .into_iter()
            .filter(|r| {
                r.course_name.to_lowercase().contains(&n)
                    || r.institution_name.to_lowercase().contains(&n)
            })
            .collect(),
        None => records,
    };

    match query.sort {
        SortKey::Date => out.sort_by(|a, b| b.issue_date.cmp(&a.issue_date)),
        SortKey::Course => out.sort_by_cached_key(|r| r.course_name.to_lowercase()),
        SortKey::Institution => out.sort_by_cached_key(|r| r.institution_name.to_lowercase()),
    }
    out
}

fn distinct_institutions(records: &[CertificateRecord]) -> usize {
    records
        .iter()
        .map(|r| r.institution_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Counters over the whole registry.
pub fn registry_stats(records: &[CertificateRecord]) -> RegistryStats {
    RegistryStats {
        total: records.len(),
        verified: records.iter().filter(|r| r.is_verified).count(),
        institutions: distinct_institutions(records),
    }
}

/// Counters over one student's certificates; "this year" is `today`'s year.
pub fn portfolio_stats(records: &[CertificateRecord], today: NaiveDate) -> PortfolioStats {
    PortfolioStats {
        total: records.len(),
        verified: records.iter().filter(|r| r.is_verified).count(),
        this_year: records
            .iter()
            .filter(|r| r.issue_date.year() == today.year())
            .count(),
        institutions: distinct_institutions(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use educert_core::types::{CertificateId, IssueRequest};

    fn rec(course: &str, institution: &str, date: &str) -> CertificateRecord {
        let issue = IssueRequest {
            student_name: "Sam".into(),
            student_email: "sam@x.com".into(),
            course_name: course.into(),
            institution_name: institution.into(),
            issue_date: date.into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        CertificateRecord::new(
            CertificateId::generate(Utc::now()),
            issue,
            String::new(),
            None,
            None,
            Utc::now(),
        )
    }

    fn sample() -> Vec<CertificateRecord> {
        vec![
            rec("Rust Basics", "Acme U", "2023-03-01"),
            rec("algorithms", "Beta College", "2024-06-15"),
            rec("Databases", "Acme U", "2024-01-10"),
        ]
    }

    fn courses(v: &[CertificateRecord]) -> Vec<&str> {
        v.iter().map(|r| r.course_name.as_str()).collect()
    }

    #[test]
    fn date_sort_is_newest_first() {
        let out = apply_query(sample(), &PortfolioQuery::default());
        assert_eq!(courses(&out), ["algorithms", "Databases", "Rust Basics"]);
    }

    #[test]
    fn course_sort_ignores_case() {
        let q = PortfolioQuery {
            search: None,
            sort: SortKey::Course,
        };
        let out = apply_query(sample(), &q);
        assert_eq!(courses(&out), ["algorithms", "Databases", "Rust Basics"]);
    }

    #[test]
    fn institution_sort_is_stable() {
        let q = PortfolioQuery {
            search: None,
            sort: SortKey::Institution,
        };
        let out = apply_query(sample(), &q);
        assert_eq!(courses(&out), ["Rust Basics", "Databases", "algorithms"]);
    }

    #[test]
    fn search_matches_course_or_institution() {
        let q = PortfolioQuery {
            search: Some("ACME".into()),
            sort: SortKey::Course,
        };
        assert_eq!(courses(&apply_query(sample(), &q)), ["Databases", "Rust Basics"]);

        let q = PortfolioQuery {
            search: Some("rithm".into()),
            sort: SortKey::Date,
        };
        assert_eq!(courses(&apply_query(sample(), &q)), ["algorithms"]);
    }

    #[test]
    fn blank_search_keeps_everything() {
        let q = PortfolioQuery {
            search: Some("   ".into()),
            sort: SortKey::Date,
        };
        assert_eq!(apply_query(sample(), &q).len(), 3);
    }

    #[test]
    fn stats_count_years_and_institutions() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let stats = portfolio_stats(&sample(), today);
        assert_eq!(
            stats,
            PortfolioStats {
                total: 3,
                verified: 3,
                this_year: 2,
                institutions: 2,
            }
        );
        assert_eq!(
            registry_stats(&sample()),
            RegistryStats {
                total: 3,
                verified: 3,
                institutions: 2,
            }
        );
    }
}
