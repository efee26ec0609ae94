// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EduCert Registry — persistent certificate registries (JSON file and
// SQLite), the ledger/content-store seams, and the issuance service that
// ties them to the digest functions in `educert-security`.

pub mod json;
pub mod ledger;
pub mod portfolio;
pub mod registry;
pub mod service;
pub mod sqlite;

pub use json::JsonRegistry;
pub use ledger::{Attachment, ContentStore, Ledger, SimulatedContentStore, SimulatedLedger};
pub use registry::CertificateRegistry;
pub use service::{CertificateService, verification_url};
pub use sqlite::SqliteRegistry;
