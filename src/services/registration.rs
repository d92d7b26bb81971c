// src/services/registration.rs

//! Registration ledger, token issuance, record patching, and recovery.
//!
//! The ledger holds at most one `DownloadRegistration` per LRN. Issuance is
//! idempotent from the caller's side: the first successful submission
//! writes the registration and its token, every later submission for the
//! same LRN observes that token. Concurrent first submissions race on the
//! store's atomic create and exactly one wins; the loser replays the
//! winner's token.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{Config, DownloadRegistration, RegistrationForm, StudentRecord};
use crate::services::IdentityVerifier;
use crate::storage::{self, CreateOutcome, DocumentStore};
use crate::token;
use crate::utils::{self, text};

/// Result of a registration submission.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,

    /// False when an earlier registration already held the token
    pub newly_issued: bool,

    /// Static path of the report the caller should fetch next
    pub report_path: String,
}

/// Service implementing the download-registration workflow.
pub struct RegistrationService {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    identity: IdentityVerifier,
}

impl RegistrationService {
    pub fn new(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Self {
        let identity = IdentityVerifier::new(Arc::clone(&config), Arc::clone(&store));
        Self {
            config,
            store,
            identity,
        }
    }

    /// Submit a download form: verify identity, register exactly once,
    /// return the token.
    ///
    /// Steps run strictly lookup → ledger create → record patch. Consent
    /// and field validation happen before any backend call.
    pub async fn register(&self, form: &RegistrationForm, consent: bool) -> Result<IssuedToken> {
        if !consent {
            return Err(AppError::validation("privacy consent is required"));
        }
        form.validate()?;

        // Lookup gates the ledger.
        self.identity.verify(&form.lrn, &form.surname).await?;

        let id = storage::student_doc_id(form.lrn.trim());
        let registration = DownloadRegistration::from_form(form, token::generate(), Utc::now());
        let doc = serde_json::to_value(&registration)?;

        match self
            .store
            .create(&self.config.collections.student_downloads, &id, &doc)
            .await?
        {
            CreateOutcome::Created => {
                self.patch_student_record(&registration).await;
                Ok(self.issued(registration.token, true))
            }
            CreateOutcome::AlreadyExists => {
                // Idempotent replay: surface whatever token the first
                // submission got, write nothing.
                let existing: DownloadRegistration = storage::decode(
                    self.store
                        .get(&self.config.collections.student_downloads, &id)
                        .await?,
                )?
                .ok_or_else(|| {
                    AppError::backend(format!("registration {id} vanished during replay"))
                })?;
                Ok(self.issued(existing.token, false))
            }
        }
    }

    /// Recover a previously issued token.
    ///
    /// The registration ledger is checked first, the patched record is the
    /// fallback. Either path re-validates the surname before revealing
    /// anything. `NotFound` when neither source has a document, `Mismatch`
    /// on surname disagreement, `NoToken` when a record exists but no
    /// token was ever issued.
    pub async fn recover(&self, lrn: &str, surname: &str) -> Result<String> {
        let lrn = lrn.trim();
        if !utils::is_valid_lrn(lrn) {
            return Err(AppError::validation("LRN must be exactly 12 digits"));
        }
        let wanted = text::normalize_name(surname);
        if wanted.is_empty() {
            return Err(AppError::validation("surname is required"));
        }

        let id = storage::student_doc_id(lrn);
        let registration: Option<DownloadRegistration> = storage::decode(
            self.store
                .get(&self.config.collections.student_downloads, &id)
                .await?,
        )?;
        let record: Option<StudentRecord> = storage::decode(
            self.store
                .get(&self.config.collections.student_records, &id)
                .await?,
        )?;

        if registration.is_none() && record.is_none() {
            return Err(AppError::not_found(format!("no records found for LRN {lrn}")));
        }

        // The canonical record wins the surname check when present; a
        // registration that outlived its record is checked against its own
        // stored surname.
        let stored = match (&record, &registration) {
            (Some(record), _) => text::normalize_name(&record.student_info.surname),
            (None, Some(registration)) => text::normalize_name(&registration.surname),
            (None, None) => unreachable!("checked above"),
        };
        if stored != wanted {
            return Err(AppError::mismatch("surname does not match our records"));
        }

        if let Some(registration) = registration {
            if !registration.token.is_empty() {
                return Ok(registration.token);
            }
        }
        if let Some(record) = record {
            if !record.student_info.token.is_empty() {
                return Ok(record.student_info.token);
            }
        }

        Err(AppError::no_token(format!(
            "no token was generated for LRN {lrn}"
        )))
    }

    /// Merge the submitted contact/guardian fields and the token onto the
    /// canonical record.
    ///
    /// Best-effort: the token is already issued by the time this runs, so
    /// failures are logged and swallowed rather than surfaced.
    async fn patch_student_record(&self, registration: &DownloadRegistration) {
        let patch = json!({
            "student_info": {
                "Address": registration.address,
                "ContactNumber": registration.contact,
                "Email": registration.email,
                "Token": registration.token,
            },
            "guardian_info": {
                "Name": registration.guardian_name,
                "ContactNumber": registration.guardian_contact,
                "Relationship": registration.relationship,
            },
        });

        let id = storage::student_doc_id(&registration.lrn);
        if let Err(error) = self
            .store
            .merge(&self.config.collections.student_records, &id, &patch)
            .await
        {
            log::warn!("Failed to patch student record {id}: {error}");
        }
    }

    fn issued(&self, token: String, newly_issued: bool) -> IssuedToken {
        IssuedToken {
            token,
            newly_issued,
            report_path: self.config.assets.report_path.clone(),
        }
    }
}
