//! Core registrant types for regkiosk.
//!
//! This module defines the registrant record, the fixed department set,
//! the registration-key derivation used for duplicate detection, and the
//! submission form that produces new records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The department a registrant belongs to.
///
/// A fixed set, matching the capture form's selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// Administration.
    Admin,
    /// Engineering.
    Engineering,
    /// Finance.
    Finance,
    /// Human resources.
    #[serde(rename = "HR")]
    Hr,
    /// Information technology.
    #[serde(rename = "IT")]
    It,
    /// Operations.
    Operations,
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Engineering => write!(f, "Engineering"),
            Self::Finance => write!(f, "Finance"),
            Self::Hr => write!(f, "HR"),
            Self::It => write!(f, "IT"),
            Self::Operations => write!(f, "Operations"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "engineering" => Ok(Self::Engineering),
            "finance" => Ok(Self::Finance),
            "hr" => Ok(Self::Hr),
            "it" => Ok(Self::It),
            "operations" => Ok(Self::Operations),
            _ => Err(Error::invalid_field_value("department", s.trim())),
        }
    }
}

/// A registered person.
///
/// Created exactly once at successful form submission and never mutated
/// afterwards. Field names serialize in camelCase to match the historical
/// on-disk document and the remote table's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    /// Registration key derived from the normalized name fields.
    pub id: String,

    /// Given name.
    pub first_name: String,

    /// Middle name, if any.
    #[serde(default)]
    pub middle_name: Option<String>,

    /// Family name.
    pub last_name: String,

    /// Department, from the fixed set.
    pub department: Department,

    /// Section, where the active form variant collects one.
    #[serde(default)]
    pub section: Option<String>,

    /// When the registration was submitted.
    pub registered_at: DateTime<Utc>,

    /// Encoded raster snapshot of the signature pad at submit time.
    pub signature_image: String,
}

impl Registrant {
    /// Full name as rendered in the records table.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// The text searched by the records view: names, department, section.
    #[must_use]
    pub fn search_haystack(&self) -> String {
        let mut text = self.full_name();
        text.push(' ');
        text.push_str(&self.department.to_string());
        if let Some(section) = &self.section {
            text.push(' ');
            text.push_str(section);
        }
        text.to_lowercase()
    }
}

/// Derive the registration key for a name tuple.
///
/// Inputs are case-folded and stripped of all whitespace, then joined
/// with `-` in first/middle/last order, with the department appended when
/// given. Distinct people with identical normalized names collide; that
/// is a documented limitation of the natural key.
#[must_use]
pub fn registration_key(
    first: &str,
    middle: &str,
    last: &str,
    department: Option<Department>,
) -> String {
    let mut key = format!(
        "{}-{}-{}",
        normalize(first),
        normalize(middle),
        normalize(last)
    );
    if let Some(dept) = department {
        key.push('-');
        key.push_str(&normalize(&dept.to_string()));
    }
    key
}

/// Case-fold and remove every whitespace character.
fn normalize(field: &str) -> String {
    field
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// A submitted registration form, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Given name.
    pub first_name: String,
    /// Middle name; blank means none.
    #[serde(default)]
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Department, from the fixed set.
    pub department: Department,
    /// Section; blank means none.
    #[serde(default)]
    pub section: String,
}

impl RegistrationForm {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first blank required field.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(Error::missing_field("firstName"));
        }
        if self.last_name.trim().is_empty() {
            return Err(Error::missing_field("lastName"));
        }
        Ok(())
    }

    /// The registration key this form derives.
    #[must_use]
    pub fn key(&self, include_department: bool) -> String {
        registration_key(
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            include_department.then_some(self.department),
        )
    }

    /// Build the record for this form.
    ///
    /// Trims the text fields, stamps the current time, and attaches the
    /// signature snapshot. The form must already have been validated.
    #[must_use]
    pub fn into_registrant(self, id: String, signature_image: String) -> Registrant {
        let middle = self.middle_name.trim();
        let section = self.section.trim();
        Registrant {
            id,
            first_name: self.first_name.trim().to_string(),
            middle_name: (!middle.is_empty()).then(|| middle.to_string()),
            last_name: self.last_name.trim().to_string(),
            department: self.department,
            section: (!section.is_empty()).then(|| section.to_string()),
            registered_at: Utc::now(),
            signature_image,
        }
    }
}
