use serde::{Deserialize, Serialize};

use crate::database::store::{LicenseStore, StoreError};

/// A tenant's license record, keyed by its registration document.
///
/// Written by an out-of-band administrative process; this service only reads
/// it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LicenseRecord {
    pub lice_docu: String,
    pub lice_nome: String,
    pub lice_bloq: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// The matched record carries the blocked flag. The caller must abort
    /// the tenant-scoped operation entirely.
    #[error("License for document '{document}' is blocked")]
    Blocked { document: String },

    /// Store I/O failure. Always surfaced, never treated as "no record".
    #[error("License store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// License lookups against the embedded store.
///
/// Every call is a fresh store round-trip; nothing is cached.
#[derive(Debug, Clone)]
pub struct LicenseService {
    store: LicenseStore,
}

impl LicenseService {
    pub fn new(store: LicenseStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LicenseStore {
        &self.store
    }

    /// Look up the license for `document` by exact key match.
    ///
    /// Returns the license display name for an active record, `None` when no
    /// record exists (allow-vs-deny for unknown tenants is the caller's
    /// policy), and fails with [`LicenseError::Blocked`] when the record's
    /// blocked flag is set.
    pub async fn validate(&self, document: &str) -> Result<Option<String>, LicenseError> {
        let record = sqlx::query_as::<_, LicenseRecord>(
            "SELECT lice_docu, lice_nome, lice_bloq FROM licencas WHERE lice_docu = ?",
        )
        .bind(document)
        .fetch_optional(self.store.pool())
        .await?;

        match record {
            None => Ok(None),
            Some(record) if record.lice_bloq => {
                tracing::warn!(document, "blocked license rejected");
                Err(LicenseError::Blocked {
                    document: document.to_string(),
                })
            }
            Some(record) => Ok(Some(record.lice_nome)),
        }
    }
}

/// Strip the punctuation used in formatted registration documents
/// ("12.345.678/0001-00" -> "12345678000100").
pub fn normalize_document(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/'))
        .collect()
}
