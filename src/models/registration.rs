//! Download registration structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils;

/// A completed download-form submission, one per LRN.
///
/// Owned exclusively by this workflow; the records store never writes here.
/// Wire field names are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRegistration {
    pub lrn: String,
    pub surname: String,
    pub address: String,
    pub contact: String,
    pub email: String,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub relationship: String,

    /// Issued download token
    #[serde(default)]
    pub token: String,

    /// Assigned by the issuing process at write time
    pub created_at: DateTime<Utc>,
}

impl DownloadRegistration {
    /// Build a registration from a validated form and a freshly issued token.
    pub fn from_form(form: &RegistrationForm, token: String, created_at: DateTime<Utc>) -> Self {
        Self {
            lrn: form.lrn.trim().to_string(),
            surname: form.surname.trim().to_string(),
            address: form.address.trim().to_string(),
            contact: form.contact.trim().to_string(),
            email: form.email.trim().to_string(),
            guardian_name: form.guardian_name.trim().to_string(),
            guardian_contact: form.guardian_contact.trim().to_string(),
            relationship: form.relationship.trim().to_string(),
            token,
            created_at,
        }
    }
}

/// The submitted download form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub lrn: String,
    pub surname: String,
    pub address: String,
    pub contact: String,
    pub email: String,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub relationship: String,
}

impl RegistrationForm {
    /// Check every required field and the LRN/email shapes.
    ///
    /// Runs before any backend call; the first failing field is reported.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("lrn", &self.lrn),
            ("surname", &self.surname),
            ("address", &self.address),
            ("contact", &self.contact),
            ("email", &self.email),
            ("guardianName", &self.guardian_name),
            ("guardianContact", &self.guardian_contact),
            ("relationship", &self.relationship),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is required")));
            }
        }

        if !utils::is_valid_lrn(self.lrn.trim()) {
            return Err(AppError::validation("LRN must be exactly 12 digits"));
        }
        if !utils::is_valid_email(self.email.trim()) {
            return Err(AppError::validation("email address is malformed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_form() -> RegistrationForm {
        RegistrationForm {
            lrn: "123456789012".to_string(),
            surname: "Santos".to_string(),
            address: "Quezon City".to_string(),
            contact: "09171234567".to_string(),
            email: "santos@example.com".to_string(),
            guardian_name: "Maria Santos".to_string(),
            guardian_contact: "09179876543".to_string(),
            relationship: "Mother".to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(sample_form().validate().is_ok());
    }

    #[test]
    fn missing_field_is_named() {
        let mut form = sample_form();
        form.guardian_contact = "  ".to_string();
        let err = form.validate().unwrap_err().to_string();
        assert!(err.contains("guardianContact"));
    }

    #[test]
    fn short_lrn_is_rejected() {
        let mut form = sample_form();
        form.lrn = "12345".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = sample_form();
        form.email = "not-an-email".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn wire_casing_is_camel() {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap();
        let registration =
            DownloadRegistration::from_form(&sample_form(), "Z9Y8X7W6".to_string(), created_at);

        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["guardianName"], "Maria Santos");
        assert_eq!(value["guardianContact"], "09179876543");
        assert_eq!(value["token"], "Z9Y8X7W6");
        assert!(value.get("createdAt").is_some());
    }
}
