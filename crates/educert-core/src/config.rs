// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Which storage engine backs the certificate registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    /// A single JSON array file (`certificates.json`).
    #[default]
    Json,
    /// A SQLite database (`certificates.db`).
    Sqlite,
}

impl RegistryBackend {
    /// File name of the registry inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "certificates.json",
            Self::Sqlite => "certificates.db",
        }
    }
}

impl std::str::FromStr for RegistryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown registry backend '{other}' (expected json or sqlite)")),
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage engine for issued certificates.
    pub registry_backend: RegistryBackend,
    /// Base URL that verification links are built from.
    pub verify_base_url: String,
    /// Artificial latency of the simulated ledger, in milliseconds.
    pub ledger_latency_ms: u64,
    /// Artificial latency of the simulated content store, in milliseconds.
    pub content_store_latency_ms: u64,
    /// Enable audit trail logging.
    pub audit_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry_backend: RegistryBackend::Json,
            verify_base_url: "http://localhost:5173".into(),
            ledger_latency_ms: 0,
            content_store_latency_ms: 0,
            audit_enabled: true,
        }
    }
}
