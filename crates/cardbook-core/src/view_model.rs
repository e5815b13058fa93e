// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Contacts view-model
//
// Combines the repository's contact list with the favorites set into one
// sorted list. The merge always runs on the latest value of both sources,
// so a burst of changes may collapse into a single recomputation.

use crate::contact::{sample_contacts, Contact};
use crate::favorites::{FavoriteSet, FavoritesPersistence};
use crate::presentation::{group_contacts, GroupedContacts};
use crate::repository::ContactRepository;
use crate::types::AppError;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Derive favorite flags from `favorites`, then order favorites first and
/// by name. The sort is stable, so equal names keep their input order.
pub fn merge_contacts(contacts: &[Contact], favorites: &FavoriteSet) -> Vec<Contact> {
    let mut merged: Vec<Contact> = contacts
        .iter()
        .map(|contact| {
            let is_favorite = favorites.contains(&contact.name);
            contact.clone().with_favorite(is_favorite)
        })
        .collect();

    merged.sort_by(|a, b| {
        b.is_favorite
            .cmp(&a.is_favorite)
            .then_with(|| a.name.cmp(&b.name))
    });
    merged
}

/// Upstream receivers read under one lock, so the last publish always
/// reflects the latest values of both sources.
struct MergedView {
    upstream: Mutex<Upstream>,
    view: watch::Sender<Vec<Contact>>,
}

struct Upstream {
    contacts: watch::Receiver<Vec<Contact>>,
    favorites: watch::Receiver<FavoriteSet>,
}

impl MergedView {
    fn recompute(&self) {
        let upstream = self.upstream.lock().unwrap_or_else(PoisonError::into_inner);
        let merged = merge_contacts(&upstream.contacts.borrow(), &upstream.favorites.borrow());

        let changed = self.view.send_if_modified(|current| {
            if *current == merged {
                false
            } else {
                *current = merged;
                true
            }
        });
        if changed {
            tracing::debug!("Merged contact view recomputed");
        }
    }
}

/// Contact list state and commands for a contacts screen
pub struct ContactsViewModel {
    repository: Arc<ContactRepository>,
    favorites: Arc<dyn FavoritesPersistence>,
    merged: Arc<MergedView>,
    view: watch::Receiver<Vec<Contact>>,
    query: RwLock<String>,
    merge_task: JoinHandle<()>,
}

impl ContactsViewModel {
    /// Build the view-model and start the merge task on the current runtime
    pub fn new(
        repository: Arc<ContactRepository>,
        favorites: Arc<dyn FavoritesPersistence>,
    ) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::Task(format!("No async runtime for the view-model: {}", e)))?;

        let upstream = Upstream {
            contacts: repository.subscribe(),
            favorites: favorites.observe(),
        };
        let initial = merge_contacts(&upstream.contacts.borrow(), &upstream.favorites.borrow());
        let (view_tx, view) = watch::channel(initial);

        let merged = Arc::new(MergedView {
            upstream: Mutex::new(upstream),
            view: view_tx,
        });

        let merge_task = runtime.spawn(Self::run_merge(
            repository.subscribe(),
            favorites.observe(),
            merged.clone(),
        ));

        Ok(Self {
            repository,
            favorites,
            merged,
            view,
            query: RwLock::new(String::new()),
            merge_task,
        })
    }

    async fn run_merge(
        mut contacts_rx: watch::Receiver<Vec<Contact>>,
        mut favorites_rx: watch::Receiver<FavoriteSet>,
        merged: Arc<MergedView>,
    ) {
        loop {
            tokio::select! {
                changed = contacts_rx.changed() => {
                    if changed.is_err() {
                        break; // Repository dropped
                    }
                }
                changed = favorites_rx.changed() => {
                    if changed.is_err() {
                        break; // Favorites store dropped
                    }
                }
            }
            merged.recompute();
        }
        tracing::debug!("Contact merge task finished");
    }

    /// Stream of the merged list
    pub fn subscribe(&self) -> watch::Receiver<Vec<Contact>> {
        self.view.clone()
    }

    /// Current merged list
    pub fn contacts(&self) -> Vec<Contact> {
        self.view.borrow().clone()
    }

    /// Contact with the given id as currently displayed
    ///
    /// Resolves the id against the repository, so with duplicate ids this is
    /// the same record `update_contact` and `delete_contact` act on.
    pub fn contact(&self, id: u32) -> Option<Contact> {
        let stored = self.repository.get(id)?;
        let shown = self
            .view
            .borrow()
            .iter()
            .find(|c| c.same_record(&stored))
            .cloned();
        shown.or_else(|| {
            let is_favorite = self.favorites.current().contains(&stored.name);
            Some(stored.with_favorite(is_favorite))
        })
    }

    /// Current favorites set
    pub fn favorites(&self) -> FavoriteSet {
        self.favorites.current()
    }

    /// Flip the favorite state shown on `contact`
    ///
    /// This reads the flag from the given contact and writes the opposite;
    /// two racing toggles for one name leave whichever write lands last.
    pub async fn toggle_favorite(&self, contact: &Contact) -> Result<(), AppError> {
        let favorites = self.favorites.clone();
        let name = contact.name.clone();
        let was_favorite = contact.is_favorite;

        let result = tokio::task::spawn_blocking(move || {
            if was_favorite {
                favorites.remove(&name)
            } else {
                favorites.add(&name)
            }
        })
        .await
        .map_err(|e| AppError::Task(e.to_string()))?;

        match &result {
            Ok(()) => self.merged.recompute(),
            Err(e) => tracing::error!("Failed to toggle favorite for {}: {}", contact.name, e),
        }
        result
    }

    /// Remove a contact; its name stays in the favorites set
    pub fn delete_contact(&self, contact: &Contact) -> bool {
        let removed = self.repository.remove(contact);
        if removed {
            tracing::info!("Deleted contact {}", contact.id);
            self.merged.recompute();
        }
        removed
    }

    /// Replace the stored record with the same id
    pub fn update_contact(&self, updated: Contact) -> bool {
        let id = updated.id;
        let changed = self.repository.update(updated);
        if changed {
            tracing::info!("Updated contact {}", id);
            self.merged.recompute();
        }
        changed
    }

    /// Reload the contact list from the bundled samples
    ///
    /// Samples are loaded whether or not the session was seeded with them.
    /// The list is not shuffled; the merged order only depends on names.
    pub fn refresh_contacts(&self) {
        self.repository.replace_all(sample_contacts());
        self.merged.recompute();
    }

    /// Set the search text
    pub fn set_query(&self, query: impl Into<String>) {
        *self.query.write().unwrap_or_else(PoisonError::into_inner) = query.into();
    }

    pub fn query(&self) -> String {
        self.query
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sections of the merged list under the current search text
    pub fn grouped(&self) -> GroupedContacts {
        let query = self.query();
        group_contacts(&self.view.borrow(), &query)
    }

    /// Stop following the repository and favorites store
    pub fn close(&self) {
        self.merge_task.abort();
    }
}

impl Drop for ContactsViewModel {
    fn drop(&mut self) {
        self.merge_task.abort();
    }
}
