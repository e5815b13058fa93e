// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Contact records
//
// A contact's favorite flag is derived from the favorites set on every
// recomputation of the merged view. Stored records never own it.

use crate::types::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is valid")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+[0-9]+[\- .]*)?(\([0-9]+\)[\- .]*)?([0-9][0-9\- .]+[0-9])$")
        .expect("phone pattern is valid")
});

/// A single entry in the contact book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
    /// Avatar color as `#RRGGBB`
    pub color_hex: String,
    /// Derived from the favorites set, see [`crate::view_model::merge_contacts`]
    #[serde(default)]
    pub is_favorite: bool,
}

impl Contact {
    pub fn new(id: u32, name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company: String::new(),
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
            color_hex: color_hex.into(),
            is_favorite: false,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Copy with the derived favorite flag set
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Avatar initials: first letter of up to two space-separated words
    pub fn initials(&self) -> String {
        self.name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Equality over stored fields, ignoring the derived favorite flag
    pub fn same_record(&self, other: &Contact) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.company == other.company
            && self.phone == other.phone
            && self.email == other.email
            && self.notes == other.notes
            && self.color_hex == other.color_hex
    }
}

/// Editable fields of a contact, as submitted by an edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

impl ContactDraft {
    /// Start a draft from an existing contact
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            company: contact.company.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            notes: contact.notes.clone(),
        }
    }

    /// Name is required; email and phone are checked only when filled in
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let email = self.email.trim();
        if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
            return Err(AppError::Validation(format!(
                "Please enter a valid email address: {}",
                email
            )));
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && !PHONE_PATTERN.is_match(phone) {
            return Err(AppError::Validation(format!(
                "Please enter a valid phone number: {}",
                phone
            )));
        }

        Ok(())
    }

    /// Contact with this draft's fields, keeping id and avatar color
    pub fn apply_to(&self, contact: &Contact) -> Contact {
        Contact {
            id: contact.id,
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            notes: self.notes.clone(),
            color_hex: contact.color_hex.clone(),
            is_favorite: contact.is_favorite,
        }
    }
}

/// Contacts every new session starts with
pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::new(1, "Alice Johnson", "#E91E63")
            .with_company("Nimbus Labs")
            .with_phone("+1 415-555-0132")
            .with_email("alice.johnson@nimbuslabs.io")
            .with_notes("Met at the design systems meetup."),
        Contact::new(2, "Brian Smith", "#2196F3")
            .with_company("Harbor Freight Logistics")
            .with_phone("+1 212-555-0178")
            .with_email("brian.smith@harborfreight.com")
            .with_notes("Prefers calls in the morning."),
        Contact::new(3, "Carla Mendes", "#4CAF50")
            .with_company("Verde Studio")
            .with_phone("+55 11 5555-0199")
            .with_email("carla@verdestudio.com.br"),
        Contact::new(4, "David Kim", "#9C27B0")
            .with_company("Kim & Partners")
            .with_phone("+82 2-555-0110")
            .with_email("dkim@kimpartners.kr")
            .with_notes("Follow up about the Q3 proposal."),
        Contact::new(5, "Emma Wilson", "#FF9800")
            .with_company("Brightside Media")
            .with_phone("+44 20 5555 0147")
            .with_email("emma.wilson@brightside.co.uk"),
        Contact::new(6, "Farid Haddad", "#009688")
            .with_company("Cedar Analytics")
            .with_phone("+961 1 555 012")
            .with_email("farid@cedaranalytics.com"),
        Contact::new(7, "Grace Lee", "#3F51B5")
            .with_company("Orbit Health")
            .with_phone("+1 646-555-0121")
            .with_email("grace.lee@orbithealth.org")
            .with_notes("Introduced by David."),
        Contact::new(8, "Hiro Tanaka", "#FF5722")
            .with_company("Tanaka Works")
            .with_phone("+81 3-5555-0163")
            .with_email("hiro@tanakaworks.jp"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(Contact::new(1, "alice johnson", "#FFFFFF").initials(), "AJ");
        assert_eq!(Contact::new(2, "Cher", "#FFFFFF").initials(), "C");
        assert_eq!(Contact::new(3, "Mary Ann Evans", "#FFFFFF").initials(), "MA");
        assert_eq!(Contact::new(4, "", "#FFFFFF").initials(), "");
    }

    #[test]
    fn test_initials_skip_repeated_spaces() {
        assert_eq!(Contact::new(1, "Ann  Lee", "#FFFFFF").initials(), "AL");
    }

    #[test]
    fn test_same_record_ignores_favorite() {
        let stored = Contact::new(1, "Ann", "#FFFFFF");
        let shown = stored.clone().with_favorite(true);
        assert!(stored.same_record(&shown));
        assert_ne!(stored, shown);
        assert!(!stored.same_record(&shown.with_phone("123")));
    }

    #[test]
    fn test_draft_requires_name() {
        let draft = ContactDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_draft_checks_email_and_phone_only_when_present() {
        let mut draft = ContactDraft {
            name: "Ann".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());

        draft.email = "not-an-email".to_string();
        assert!(draft.validate().is_err());
        draft.email = "ann@example.com".to_string();
        assert!(draft.validate().is_ok());

        draft.phone = "call me".to_string();
        assert!(draft.validate().is_err());
        draft.phone = "+1 (415) 555-0132".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_apply_keeps_identity() {
        let contact = Contact::new(7, "Ann", "#2196F3").with_phone("555-0100");
        let mut draft = ContactDraft::from_contact(&contact);
        draft.name = " Annie ".to_string();

        let updated = draft.apply_to(&contact);
        assert_eq!(updated.id, 7);
        assert_eq!(updated.name, "Annie");
        assert_eq!(updated.phone, "555-0100");
        assert_eq!(updated.color_hex, "#2196F3");
    }

    #[test]
    fn test_sample_contacts_have_unique_ids() {
        let contacts = sample_contacts();
        let mut ids: Vec<u32> = contacts.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), contacts.len());
        assert!(contacts.iter().all(|c| ContactDraft::from_contact(c).validate().is_ok()));
    }
}
