// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// educert-security — certificate fingerprints and the tamper-evident audit
// trail.
//
// The digest functions here are the only place that decides how a
// certificate's identifying fields are turned into its `certificateHash`.

pub mod audit;
pub mod integrity;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use integrity::{certificate_digest, hash_bytes, verify_hash, verify_record_digest};
