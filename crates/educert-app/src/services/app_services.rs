// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — opens the registry and audit log, builds the
// certificate service from the persisted config, and records every issue,
// verify and check attempt in the audit trail.
//
// `AuditLog` wraps a rusqlite connection, which is `Send` but not `Sync`,
// so it sits behind `Arc<Mutex<>>` like the registry inside the service.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use educert_core::error::Result;
use educert_core::types::{
    CertificateId, CertificateRecord, IssueRequest, PortfolioQuery, PortfolioStats,
    RegistryStats,
};
use educert_core::{AppConfig, RegistryBackend};
use educert_registry::{
    Attachment, CertificateRegistry, CertificateService, JsonRegistry, SimulatedContentStore,
    SimulatedLedger, SqliteRegistry, verification_url,
};
use educert_security::audit::{AuditAction, AuditEntry, AuditLog};
use tracing::{error, info};

use super::data_dir;

type DynRegistry = Box<dyn CertificateRegistry + Send>;
type Service = CertificateService<DynRegistry, SimulatedLedger, SimulatedContentStore>;

/// Shared application state for one process.
///
/// Cheaply cloneable; every field is Arc-wrapped.
#[derive(Clone)]
pub struct AppServices {
    service: Arc<Service>,
    /// `None` when auditing is disabled in the config.
    audit_log: Option<Arc<Mutex<AuditLog>>>,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise all services from the data directory.
    ///
    /// Creates the directory if needed, loads `config.json` (defaults when
    /// missing or unreadable), and opens the configured registry backend
    /// and the audit database.
    pub fn init(override_dir: Option<&Path>) -> Result<Self> {
        let dir = data_dir::data_dir(override_dir)?;
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&dir).unwrap_or_default();

        let registry_path = dir.join(config.registry_backend.file_name());
        let registry: DynRegistry = match config.registry_backend {
            RegistryBackend::Json => Box::new(JsonRegistry::open(&registry_path)?),
            RegistryBackend::Sqlite => Box::new(SqliteRegistry::open(&registry_path)?),
        };

        let audit_log = if config.audit_enabled {
            Some(AuditLog::open(dir.join("audit.db"))?)
        } else {
            None
        };

        info!(backend = ?config.registry_backend, "app services initialised");
        Ok(Self::assemble(registry, audit_log, dir, config))
    }

    /// Services over an in-memory registry and audit log.
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        let audit_log = if config.audit_enabled {
            Some(AuditLog::open_in_memory()?)
        } else {
            None
        };
        Ok(Self::assemble(
            Box::new(JsonRegistry::in_memory()),
            audit_log,
            std::env::temp_dir(),
            config,
        ))
    }

    fn assemble(
        registry: DynRegistry,
        audit_log: Option<AuditLog>,
        data_dir: PathBuf,
        config: AppConfig,
    ) -> Self {
        let ledger = SimulatedLedger::new(Duration::from_millis(config.ledger_latency_ms));
        let content =
            SimulatedContentStore::new(Duration::from_millis(config.content_store_latency_ms));

        Self {
            service: Arc::new(CertificateService::new(registry, ledger, content)),
            audit_log: audit_log.map(|log| Arc::new(Mutex::new(log))),
            data_dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Issuance & verification ---------------------------------------------

    /// Issue a certificate, reading attachments from `attachment_paths`.
    pub async fn issue(
        &self,
        request: &IssueRequest,
        attachment_paths: &[PathBuf],
    ) -> Result<CertificateRecord> {
        let attachments = attachment_paths
            .iter()
            .map(Attachment::from_path)
            .collect::<Result<Vec<_>>>()?;

        match self.service.issue(request, &attachments).await {
            Ok(record) => {
                self.audit(
                    AuditAction::Issue,
                    record.id.as_str(),
                    true,
                    Some(&record.certificate_hash),
                );
                Ok(record)
            }
            Err(e) => {
                self.audit(AuditAction::Issue, &request.student_email, false, Some(&e.to_string()));
                Err(e)
            }
        }
    }

    /// Look a certificate up by id.
    pub fn verify(&self, id: &str) -> Result<CertificateRecord> {
        let result = self.service.verify(id);
        self.audit_result(AuditAction::Verify, id, &result);
        result
    }

    /// Look a certificate up by id and recompute its digest.
    pub fn check(&self, id: &str) -> Result<CertificateRecord> {
        let result = self.service.check(id);
        self.audit_result(AuditAction::Check, id, &result);
        result
    }

    pub fn portfolio(&self, email: &str, query: &PortfolioQuery) -> Result<Vec<CertificateRecord>> {
        self.service.portfolio(email, query)
    }

    pub fn portfolio_stats(&self, email: &str, today: NaiveDate) -> Result<PortfolioStats> {
        self.service.portfolio_stats(email, today)
    }

    pub fn registry_stats(&self) -> Result<RegistryStats> {
        self.service.registry_stats()
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        self.service.recent(limit)
    }

    /// Verification link for `id` under the configured base URL.
    pub fn verification_url(&self, id: &CertificateId) -> String {
        verification_url(&self.config().verify_base_url, id)
    }

    // -- Audit Trail ---------------------------------------------------------

    /// Record an audit entry. Failures are logged, never propagated.
    fn audit(&self, action: AuditAction, subject: &str, success: bool, details: Option<&str>) {
        let Some(log) = &self.audit_log else {
            return;
        };
        match lock_audit(log) {
            Ok(log) => {
                if let Err(e) = log.record(action, subject, success, details) {
                    error!(error = %e, "failed to record audit entry");
                }
            }
            Err(e) => error!(error = %e, %subject, "audit entry dropped"),
        }
    }

    fn audit_result(&self, action: AuditAction, id: &str, result: &Result<CertificateRecord>) {
        match result {
            Ok(_) => self.audit(action, id.trim(), true, None),
            Err(e) => self.audit(action, id.trim(), false, Some(&e.to_string())),
        }
    }

    /// Most recent audit entries, newest first. Empty when auditing is off.
    pub fn recent_audit_entries(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        match &self.audit_log {
            Some(log) => lock_audit(log)?.recent_entries(limit),
            None => Ok(Vec::new()),
        }
    }

    /// Audit entries about one certificate id, oldest first.
    pub fn audit_entries_for(&self, subject: &str) -> Result<Vec<AuditEntry>> {
        match &self.audit_log {
            Some(log) => lock_audit(log)?.entries_for(subject),
            None => Ok(Vec::new()),
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        match self.config.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Update and persist the config. Takes effect on the next start.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        match self.config.lock() {
            Ok(mut guard) => *guard = config.clone(),
            Err(poisoned) => *poisoned.into_inner() = config.clone(),
        }
        persist_config(&self.data_dir, config)
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn lock_audit(log: &Mutex<AuditLog>) -> Result<std::sync::MutexGuard<'_, AuditLog>> {
    log.lock()
        .map_err(|_| educert_core::EducertError::Database("audit lock poisoned".into()))
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
