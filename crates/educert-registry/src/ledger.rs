// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External service seams: the ledger a certificate digest is anchored on,
// and the content store its attachments are uploaded to.
//
// Only simulated implementations ship today. They produce references in the
// same formats the web portal displayed (`0x…` transaction hashes, `Qm…`
// content ids) after an optional artificial delay.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use educert_core::error::{EducertError, Result};
use educert_core::types::random_base36;
use educert_security::hash_bytes;

/// A file attached to a certificate at issuance.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read an attachment from disk, keeping only the file name.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// SHA-256 of the attachment bytes.
    pub fn sha256(&self) -> String {
        hash_bytes(&self.bytes)
    }
}

/// Where certificate digests are anchored.
pub trait Ledger {
    /// Record `digest` and return the transaction reference.
    fn anchor(&self, digest: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Where certificate attachments are stored.
pub trait ContentStore {
    /// Store `attachments` as one bundle and return its content reference.
    fn put(&self, attachments: &[Attachment]) -> impl Future<Output = Result<String>> + Send;
}

// `ThreadRng` is not `Send`, so it never lives across an await.
fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    rand::thread_rng().fill(&mut out[..]);
    out
}

/// Ledger stand-in: waits `latency`, then returns `0x` + 64 random hex chars.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLedger {
    latency: Duration,
}

impl SimulatedLedger {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Ledger for SimulatedLedger {
    #[instrument(skip(self))]
    async fn anchor(&self, digest: &str) -> Result<String> {
        if digest.is_empty() {
            return Err(EducertError::Ledger("refusing to anchor an empty digest".into()));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let tx = format!("0x{}", hex::encode(random_bytes::<32>()));
        debug!(%tx, "digest anchored");
        Ok(tx)
    }
}

/// Content-store stand-in: waits `latency`, then returns `Qm` + 44 random
/// base36 chars.
#[derive(Debug, Clone, Default)]
pub struct SimulatedContentStore {
    latency: Duration,
}

impl SimulatedContentStore {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl ContentStore for SimulatedContentStore {
    #[instrument(skip_all, fields(files = attachments.len()))]
    async fn put(&self, attachments: &[Attachment]) -> Result<String> {
        if attachments.is_empty() {
            return Err(EducertError::ContentStore("no attachments to upload".into()));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let cid = format!("Qm{}", random_base36(44));
        for a in attachments {
            debug!(name = %a.name, sha256 = %a.sha256(), %cid, "attachment stored");
        }
        Ok(cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ledger_reference_shape() {
        let tx = SimulatedLedger::default().anchor("abc").await.unwrap();
        assert!(tx.starts_with("0x"));
        assert_eq!(tx.len(), 66);
        assert!(tx[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn ledger_references_differ() {
        let ledger = SimulatedLedger::default();
        assert_ne!(ledger.anchor("abc").await.unwrap(), ledger.anchor("abc").await.unwrap());
    }

    #[tokio::test]
    async fn empty_digest_rejected() {
        assert!(matches!(
            SimulatedLedger::default().anchor("").await,
            Err(EducertError::Ledger(_))
        ));
    }

    #[tokio::test]
    async fn content_reference_shape() {
        let files = [Attachment {
            name: "transcript.pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        }];
        let cid = SimulatedContentStore::default().put(&files).await.unwrap();
        assert!(cid.starts_with("Qm"));
        assert_eq!(cid.len(), 46);
    }

    #[tokio::test]
    async fn references_are_spread_over_every_position() {
        use std::collections::HashSet;

        let ledger = SimulatedLedger::default();
        let store = SimulatedContentStore::default();
        let files = [Attachment {
            name: "a.pdf".into(),
            bytes: vec![0],
        }];
        let mut txs = Vec::new();
        let mut cids = Vec::new();
        for _ in 0..400 {
            txs.push(ledger.anchor("abc").await.unwrap());
            cids.push(store.put(&files).await.unwrap());
        }

        for pos in 2..66 {
            let seen: HashSet<u8> = txs.iter().map(|t| t.as_bytes()[pos]).collect();
            assert!(seen.len() >= 12, "tx position {pos} only saw {seen:?}");
        }
        for pos in 2..46 {
            let seen: HashSet<u8> = cids.iter().map(|c| c.as_bytes()[pos]).collect();
            assert!(seen.len() > 24, "cid position {pos} only saw {} symbols", seen.len());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let ledger = SimulatedLedger::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        ledger.anchor("abc").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn attachment_from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diploma.png");
        std::fs::write(&path, b"png").unwrap();
        let a = Attachment::from_path(&path).unwrap();
        assert_eq!(a.name, "diploma.png");
        assert_eq!(a.sha256(), hash_bytes(b"png"));
    }
}
