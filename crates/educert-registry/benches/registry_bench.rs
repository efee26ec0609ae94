// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for registry append and e-mail lookup on both
// backends.

use chrono::Utc;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use educert_core::types::{CertificateId, CertificateRecord, IssueRequest};
use educert_registry::{CertificateRegistry, JsonRegistry, SqliteRegistry};

fn record(i: usize) -> CertificateRecord {
    let issue = IssueRequest {
        student_name: format!("Student {i}"),
        student_email: format!("student{}@example.edu", i % 50),
        course_name: "Distributed Systems".into(),
        institution_name: "Acme University".into(),
        issue_date: "2024-01-01".into(),
        ..Default::default()
    }
    .validate()
    .expect("valid request");
    let now = Utc::now();
    CertificateRecord::new(
        CertificateId::generate(now),
        issue,
        "ab".repeat(32),
        None,
        Some(format!("0x{}", "cd".repeat(32))),
        now,
    )
}

fn filled<R: CertificateRegistry>(mut reg: R, n: usize) -> R {
    for i in 0..n {
        reg.append(record(i)).expect("append failed");
    }
    reg
}

/// Appending to a 1000-record registry, in memory and in SQLite.
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_append");
    group.bench_function("json (in-memory)", |b| {
        b.iter_batched(
            || (filled(JsonRegistry::in_memory(), 1000), record(1000)),
            |(mut reg, rec)| black_box(reg.append(rec).expect("append failed")),
            BatchSize::LargeInput,
        );
    });
    group.bench_function("sqlite (in-memory)", |b| {
        let mut reg = filled(SqliteRegistry::open_in_memory().expect("open"), 1000);
        let mut i = 1000;
        b.iter(|| {
            i += 1;
            black_box(reg.append(record(i)).expect("append failed"));
        });
    });
    group.finish();
}

/// Case-insensitive e-mail lookup over 1000 records (20 matches each).
fn bench_find_by_email(c: &mut Criterion) {
    let json = filled(JsonRegistry::in_memory(), 1000);
    let sqlite = filled(SqliteRegistry::open_in_memory().expect("open"), 1000);

    let mut group = c.benchmark_group("registry_find_by_email");
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.find_by_email(black_box("STUDENT7@example.edu"))))
    });
    group.bench_function("sqlite", |b| {
        b.iter(|| black_box(sqlite.find_by_email(black_box("STUDENT7@example.edu"))))
    });
    group.finish();
}

criterion_group!(benches, bench_append, bench_find_by_email);
criterion_main!(benches);
