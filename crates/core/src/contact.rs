//! Customer contact fields captured on an order.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of any single contact field.
pub const MAX_CONTACT_FIELD_LEN: usize = 200;

/// Maximum length of free-text order notes.
pub const MAX_NOTES_LEN: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactInfo {
    /// Trim whitespace and drop empty optional fields.
    pub fn normalized(self) -> Self {
        let opt = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            contact_email: opt(self.contact_email),
            notes: opt(self.notes),
        }
    }

    /// Name and phone are required; lengths are bounded.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("contact_name", &self.contact_name)?;
        require_non_empty("contact_phone", &self.contact_phone)?;
        check_len("contact_name", &self.contact_name, MAX_CONTACT_FIELD_LEN)?;
        check_len("contact_phone", &self.contact_phone, MAX_CONTACT_FIELD_LEN)?;
        if let Some(email) = &self.contact_email {
            check_len("contact_email", email, MAX_CONTACT_FIELD_LEN)?;
            if !email.contains('@') {
                return Err(CoreError::Validation(format!(
                    "contact_email '{email}' is not a valid address"
                )));
            }
        }
        if let Some(notes) = &self.notes {
            check_len("notes", notes, MAX_NOTES_LEN)?;
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} is {len} characters, maximum is {max}"
        )));
    }
    Ok(())
}
