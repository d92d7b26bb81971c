// src/services/identity.rs

//! Identity lookup against the records store.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, StudentRecord};
use crate::storage::{self, DocumentStore};
use crate::utils::{self, text};

/// Service that confirms a (LRN, surname) pair against the records store.
///
/// Gates the registration ledger: callers may only submit the download form
/// once a lookup has succeeded for the same pair.
pub struct IdentityVerifier {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
}

impl IdentityVerifier {
    pub fn new(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Look up and confirm a student.
    ///
    /// Malformed input fails with `Validation` before any backend call.
    /// A missing record fails with `NotFound`; a normalized surname
    /// disagreement fails with `Mismatch`.
    pub async fn verify(&self, lrn: &str, surname: &str) -> Result<StudentRecord> {
        let lrn = lrn.trim();
        if !utils::is_valid_lrn(lrn) {
            return Err(AppError::validation("LRN must be exactly 12 digits"));
        }

        let wanted = text::normalize_name(surname);
        if wanted.is_empty() {
            return Err(AppError::validation("surname is required"));
        }

        let id = storage::student_doc_id(lrn);
        let record: StudentRecord = storage::decode(
            self.store
                .get(&self.config.collections.student_records, &id)
                .await?,
        )?
        .ok_or_else(|| AppError::not_found(format!("no student record for LRN {lrn}")))?;

        let stored = text::normalize_name(&record.student_info.surname);
        if stored != wanted {
            return Err(AppError::mismatch("surname does not match our records"));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn verifier(tmp: &TempDir) -> IdentityVerifier {
        let config = Arc::new(Config::default());
        let store = Arc::new(LocalStore::new(tmp.path()));
        IdentityVerifier::new(config, store)
    }

    async fn seed_record(tmp: &TempDir, lrn: &str, surname: &str) {
        let store = LocalStore::new(tmp.path());
        store
            .put(
                "student_records",
                &storage::student_doc_id(lrn),
                &json!({"student_info": {"Surname": surname}}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn malformed_lrn_fails_before_any_lookup() {
        // rooted at a path that does not exist; a backend call would error
        let verifier = IdentityVerifier::new(
            Arc::new(Config::default()),
            Arc::new(LocalStore::new("/nonexistent/store")),
        );

        let err = verifier.verify("12345", "Santos").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = verifier.verify("123456789012", "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_lrn_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = verifier(&tmp)
            .verify("123456789012", "Santos")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn surname_disagreement_is_mismatch() {
        let tmp = TempDir::new().unwrap();
        seed_record(&tmp, "123456789012", "Santos").await;

        let err = verifier(&tmp)
            .verify("123456789012", "Reyes")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Mismatch(_)));
    }

    #[tokio::test]
    async fn surname_match_is_normalized() {
        let tmp = TempDir::new().unwrap();
        seed_record(&tmp, "123456789012", "Dela Cruz").await;

        let verifier = verifier(&tmp);
        assert!(verifier.verify("123456789012", "dela cruz").await.is_ok());
        assert!(verifier.verify("123456789012", "Déla Cruz ").await.is_ok());
        assert!(verifier.verify("123456789012", "DELACRUZ").await.is_ok());
    }

    #[tokio::test]
    async fn record_without_student_info_mismatches() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        store
            .put(
                "student_records",
                "student_123456789012",
                &json!({"enrollment_year": 2024}),
            )
            .await
            .unwrap();

        let err = verifier(&tmp)
            .verify("123456789012", "Santos")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Mismatch(_)));
    }
}
