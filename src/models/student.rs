//! Canonical student record structures.

use serde::{Deserialize, Serialize};

/// A canonical student record from the records store.
///
/// Created and maintained by guidance staff. The portal never creates or
/// deletes these; after a successful issuance it merges the contact fields,
/// the token, and the guardian sub-object back onto the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentRecord {
    /// Nested `student_info` sub-object
    #[serde(default)]
    pub student_info: StudentInfo,

    /// Nested `guardian_info` sub-object, absent until first issuance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_info: Option<GuardianInfo>,
}

/// The `student_info` sub-object. Field names are PascalCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentInfo {
    #[serde(rename = "Surname", default)]
    pub surname: String,

    #[serde(rename = "Address", default, skip_serializing_if = "String::is_empty")]
    pub address: String,

    #[serde(
        rename = "ContactNumber",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub contact_number: String,

    #[serde(rename = "Email", default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    /// Issued download token, empty until first registration
    #[serde(rename = "Token", default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

/// The `guardian_info` sub-object. Field names are PascalCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuardianInfo {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "ContactNumber", default)]
    pub contact_number: String,

    #[serde(rename = "Relationship", default)]
    pub relationship: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_casing_is_pascal() {
        let record = StudentRecord {
            student_info: StudentInfo {
                surname: "Santos".to_string(),
                token: "AB12CD34".to_string(),
                ..StudentInfo::default()
            },
            guardian_info: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["student_info"]["Surname"], "Santos");
        assert_eq!(value["student_info"]["Token"], "AB12CD34");
        assert!(value["student_info"].get("Address").is_none());
    }

    #[test]
    fn tolerates_missing_sub_objects() {
        let record: StudentRecord = serde_json::from_str("{}").unwrap();
        assert!(record.student_info.surname.is_empty());
        assert!(record.guardian_info.is_none());
    }
}
