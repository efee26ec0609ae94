// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate issuance and verification.
//
// `issue` runs validate -> upload attachments -> digest -> anchor -> append.
// Nothing reaches the content store, the ledger, or the registry unless the
// request validated. The registry lock is only taken for the final append,
// never across an await.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};

use educert_core::error::{EducertError, Result};
use educert_core::types::{
    CertificateId, CertificateRecord, IssueRequest, PortfolioQuery, PortfolioStats,
    RegistryStats,
};
use educert_security::{certificate_digest, verify_record_digest};

use crate::ledger::{Attachment, ContentStore, Ledger};
use crate::portfolio;
use crate::registry::CertificateRegistry;

/// Link a verifier can open to look a certificate up.
pub fn verification_url(base: &str, id: &CertificateId) -> String {
    format!("{}/verify/{id}", base.trim_end_matches('/'))
}

/// Issues, verifies and lists certificates over one registry.
pub struct CertificateService<R, L, C> {
    registry: Mutex<R>,
    ledger: L,
    content: C,
}

impl<R, L, C> CertificateService<R, L, C>
where
    R: CertificateRegistry,
    L: Ledger,
    C: ContentStore,
{
    pub fn new(registry: R, ledger: L, content: C) -> Self {
        Self {
            registry: Mutex::new(registry),
            ledger,
            content,
        }
    }

    fn registry(&self) -> Result<MutexGuard<'_, R>> {
        self.registry
            .lock()
            .map_err(|_| EducertError::Database("registry lock poisoned".into()))
    }

    /// Issue a certificate and return the stored record.
    #[instrument(skip_all, fields(course = %request.course_name, files = attachments.len()))]
    pub async fn issue(
        &self,
        request: &IssueRequest,
        attachments: &[Attachment],
    ) -> Result<CertificateRecord> {
        let issue = request.validate()?;

        let ipfs_hash = if attachments.is_empty() {
            None
        } else {
            Some(self.content.put(attachments).await?)
        };

        let digest = certificate_digest(
            &issue.student_name,
            &issue.student_email,
            &issue.course_name,
            &issue.institution_name,
            &issue.issue_date_str(),
        );

        let transaction_hash = self.ledger.anchor(&digest).await?;

        let now = Utc::now();
        let record = CertificateRecord::new(
            CertificateId::generate(now),
            issue,
            digest,
            ipfs_hash,
            Some(transaction_hash),
            now,
        );

        self.registry()?.append(record.clone())?;
        info!(id = %record.id, hash = %record.certificate_hash, "certificate issued");
        Ok(record)
    }

    /// Look a certificate up by id. Existence in the registry is what makes
    /// a certificate valid here; see [`Self::check`] for the digest recheck.
    #[instrument(skip(self))]
    pub fn verify(&self, id: &str) -> Result<CertificateRecord> {
        let id = id.trim();
        if id.is_empty() {
            return Err(EducertError::ValidationFailed("certificate id is empty".into()));
        }
        match self.registry()?.find_by_id(&CertificateId::from(id))? {
            Some(record) => Ok(record),
            None => {
                warn!(%id, "certificate not found");
                Err(EducertError::NotFound(id.to_owned()))
            }
        }
    }

    /// Verify by id, then recompute the digest from the stored fields.
    pub fn check(&self, id: &str) -> Result<CertificateRecord> {
        let record = self.verify(id)?;
        verify_record_digest(&record)?;
        Ok(record)
    }

    /// Every certificate issued to `email` (case-insensitive).
    pub fn certificates_for(&self, email: &str) -> Result<Vec<CertificateRecord>> {
        self.registry()?.find_by_email(email)
    }

    /// A student's certificates, filtered and ordered by `query`.
    pub fn portfolio(&self, email: &str, query: &PortfolioQuery) -> Result<Vec<CertificateRecord>> {
        Ok(portfolio::apply_query(self.certificates_for(email)?, query))
    }

    pub fn portfolio_stats(&self, email: &str, today: NaiveDate) -> Result<PortfolioStats> {
        Ok(portfolio::portfolio_stats(&self.certificates_for(email)?, today))
    }

    pub fn registry_stats(&self) -> Result<RegistryStats> {
        Ok(portfolio::registry_stats(&self.registry()?.all()?))
    }

    /// The last `limit` issued certificates, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        self.registry()?.recent(limit)
    }
}
