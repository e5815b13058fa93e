// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Sharing and quick actions
//
// Describes the system intents a frontend hands to the platform. Nothing here
// launches anything; frontends map a ShareIntent onto their own API.

use crate::contact::Contact;
use crate::types::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of system action to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    Dial,
    View,
    SendTo,
    Send,
    CopyToClipboard,
}

/// Where a contact card is shared to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Message,
    Email,
    #[serde(rename = "system")]
    SystemPicker,
    Clipboard,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::Message,
        ShareTarget::Email,
        ShareTarget::SystemPicker,
        ShareTarget::Clipboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Email => "email",
            Self::SystemPicker => "system",
            Self::Clipboard => "clipboard",
        }
    }

    /// Label shown in the share sheet
    pub fn title(&self) -> &'static str {
        match self {
            Self::Message => "Share via Message",
            Self::Email => "Share via Email",
            Self::SystemPicker => "More Options",
            Self::Clipboard => "Copy Contact Details",
        }
    }
}

impl std::fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidConfig(format!("Unknown share target: {}", s)))
    }
}

/// A platform-neutral request to open another app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareIntent {
    pub action: IntentAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Title of the chooser dialog, when the platform should show one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chooser_title: Option<String>,
}

impl ShareIntent {
    fn new(action: IntentAction) -> Self {
        Self {
            action,
            uri: None,
            mime_type: None,
            recipients: Vec::new(),
            subject: None,
            text: None,
            chooser_title: None,
        }
    }

    /// Open the dialer with the number filled in
    pub fn dial(phone: &str) -> Self {
        Self {
            uri: Some(format!("tel:{}", phone)),
            ..Self::new(IntentAction::Dial)
        }
    }

    /// Open the messaging app addressed to the number
    pub fn sms(phone: &str) -> Self {
        Self {
            uri: Some(format!("sms:{}", phone)),
            ..Self::new(IntentAction::View)
        }
    }

    /// Compose an email to the contact
    pub fn email(contact: &Contact) -> Self {
        Self {
            uri: Some("mailto:".to_string()),
            recipients: vec![contact.email.clone()],
            subject: Some(format!("Regarding {}", contact.name)),
            ..Self::new(IntentAction::SendTo)
        }
    }

    /// Share the contact's details to `target`
    pub fn share(contact: &Contact, target: ShareTarget) -> Self {
        let text = Some(contact_details_text(contact));
        match target {
            ShareTarget::Message => Self {
                mime_type: Some("vnd.android-dir/mms-sms".to_string()),
                text,
                ..Self::new(IntentAction::View)
            },
            ShareTarget::Email => Self {
                mime_type: Some("message/rfc822".to_string()),
                recipients: vec![contact.email.clone()],
                subject: Some(format!("Contact: {}", contact.name)),
                text,
                chooser_title: Some("Send Email".to_string()),
                ..Self::new(IntentAction::Send)
            },
            ShareTarget::SystemPicker => Self {
                mime_type: Some("text/plain".to_string()),
                text,
                chooser_title: Some("Share via".to_string()),
                ..Self::new(IntentAction::Send)
            },
            ShareTarget::Clipboard => Self {
                subject: Some("Contact Details".to_string()),
                text,
                ..Self::new(IntentAction::CopyToClipboard)
            },
        }
    }
}

/// Plain-text summary used as the body of every share
pub fn contact_details_text(contact: &Contact) -> String {
    format!(
        "Contact Details:\nName: {}\nPhone: {}\nEmail: {}\nCompany: {}\nNotes: {}",
        contact.name, contact.phone, contact.email, contact.company, contact.notes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Contact {
        Contact::new(1, "Ann Lee", "#E91E63")
            .with_company("Nimbus")
            .with_phone("+1 415-555-0132")
            .with_email("ann@nimbus.io")
            .with_notes("Met at the meetup")
    }

    #[test]
    fn test_details_text() {
        let text = contact_details_text(&ann());
        assert_eq!(
            text,
            "Contact Details:\nName: Ann Lee\nPhone: +1 415-555-0132\nEmail: ann@nimbus.io\nCompany: Nimbus\nNotes: Met at the meetup"
        );
    }

    #[test]
    fn test_quick_actions() {
        let contact = ann();
        assert_eq!(
            ShareIntent::dial(&contact.phone).uri.as_deref(),
            Some("tel:+1 415-555-0132")
        );
        assert_eq!(ShareIntent::sms("555").uri.as_deref(), Some("sms:555"));

        let email = ShareIntent::email(&contact);
        assert_eq!(email.action, IntentAction::SendTo);
        assert_eq!(email.recipients, vec!["ann@nimbus.io"]);
        assert_eq!(email.subject.as_deref(), Some("Regarding Ann Lee"));
    }

    #[test]
    fn test_share_targets() {
        let contact = ann();

        let email = ShareIntent::share(&contact, ShareTarget::Email);
        assert_eq!(email.mime_type.as_deref(), Some("message/rfc822"));
        assert_eq!(email.subject.as_deref(), Some("Contact: Ann Lee"));

        let picker = ShareIntent::share(&contact, ShareTarget::SystemPicker);
        assert_eq!(picker.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(picker.chooser_title.as_deref(), Some("Share via"));

        let clip = ShareIntent::share(&contact, ShareTarget::Clipboard);
        assert_eq!(clip.action, IntentAction::CopyToClipboard);
        assert_eq!(clip.text, Some(contact_details_text(&contact)));
    }

    #[test]
    fn test_target_names() {
        for target in ShareTarget::ALL {
            assert_eq!(target.as_str().parse::<ShareTarget>().unwrap(), target);
        }
        assert_eq!("EMAIL".parse::<ShareTarget>().unwrap(), ShareTarget::Email);
        assert!("fax".parse::<ShareTarget>().is_err());
    }
}
