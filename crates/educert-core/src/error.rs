// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for EduCert.

use thiserror::Error;

/// Top-level error type for all EduCert operations.
#[derive(Debug, Error)]
pub enum EducertError {
    // -- Registry errors --
    #[error("certificate not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("certificate id already registered: {0}")]
    DuplicateId(String),

    // -- Integrity --
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- External services --
    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("content store error: {0}")]
    ContentStore(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EducertError>;
