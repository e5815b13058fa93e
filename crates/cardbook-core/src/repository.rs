// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - In-memory contact repository
//
// Holds the canonical contact list for one session. Edits are not persisted;
// a new session starts from whatever list it is created with.

use crate::contact::Contact;
use tokio::sync::watch;

/// Session-scoped owner of the contact records
///
/// Ids are not checked for uniqueness. When the list holds duplicate ids,
/// lookups and updates act on the first record with that id.
pub struct ContactRepository {
    contacts: watch::Sender<Vec<Contact>>,
}

impl ContactRepository {
    pub fn new(initial: Vec<Contact>) -> Self {
        let (contacts, _) = watch::channel(stored(initial));
        Self { contacts }
    }

    /// Start a new session with the given contacts
    pub fn reset(&self, initial: Vec<Contact>) {
        tracing::info!("Resetting contact repository with {} contacts", initial.len());
        self.contacts.send_replace(stored(initial));
    }

    /// Stream of the contact list; the current list is available immediately
    pub fn subscribe(&self) -> watch::Receiver<Vec<Contact>> {
        self.contacts.subscribe()
    }

    /// Copy of the current list
    pub fn snapshot(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    /// First contact with the given id
    pub fn get(&self, id: u32) -> Option<Contact> {
        self.contacts.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.contacts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.borrow().is_empty()
    }

    /// Number of live subscriptions to the contact list
    pub fn subscriber_count(&self) -> usize {
        self.contacts.receiver_count()
    }

    /// Replace the whole list
    pub fn replace_all(&self, contacts: Vec<Contact>) {
        tracing::debug!("Replacing contact list ({} contacts)", contacts.len());
        self.contacts.send_replace(stored(contacts));
    }

    /// Remove the first record equal to `contact`, ignoring its favorite flag
    pub fn remove(&self, contact: &Contact) -> bool {
        self.contacts.send_if_modified(|contacts| {
            match contacts.iter().position(|c| c.same_record(contact)) {
                Some(index) => {
                    contacts.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    /// Replace the first record with the same id; unknown ids are ignored
    pub fn update(&self, updated: Contact) -> bool {
        let updated = updated.with_favorite(false);
        self.contacts.send_if_modified(|contacts| {
            match contacts.iter_mut().find(|c| c.id == updated.id) {
                Some(existing) if *existing != updated => {
                    *existing = updated;
                    true
                }
                _ => false,
            }
        })
    }
}

impl Default for ContactRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Stored records never carry a favorite flag
fn stored(contacts: Vec<Contact>) -> Vec<Contact> {
    contacts
        .into_iter()
        .map(|contact| contact.with_favorite(false))
        .collect()
}
