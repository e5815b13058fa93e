// SPDX-License-Identifier: AGPL-3.0
// Cardbook CLI - Session Bridge
//
// Bridges the async ContactsViewModel with the synchronous command line.
// The view-model lives on the session task; everything else talks to it
// through commands and reply channels.

use async_channel::{Receiver, Sender};
use cardbook_core::{
    AppError, Contact, ContactDraft, ContactRepository, ContactsViewModel, FavoriteSet,
    FavoritesPersistence, GroupedContacts,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Commands that can be sent to the session
#[derive(Debug)]
pub enum SessionCommand {
    ListContacts {
        query: String,
        reply: Sender<GroupedContacts>,
    },
    GetContact {
        id: u32,
        reply: Sender<Option<Contact>>,
    },
    ToggleFavorite {
        id: u32,
        reply: Sender<Result<Contact, AppError>>,
    },
    DeleteContact {
        id: u32,
        reply: Sender<Result<Contact, AppError>>,
    },
    UpdateContact {
        id: u32,
        draft: ContactDraft,
        reply: Sender<Result<Contact, AppError>>,
    },
    Refresh,
    GetFavorites {
        reply: Sender<FavoriteSet>,
    },
}

/// Notifications from the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ContactsChanged { count: usize, favorites: usize },
}

/// Bridge between the command line and the async view-model
pub struct SessionBridge {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    _runtime: Arc<Runtime>,
}

impl SessionBridge {
    pub fn new(
        repository: Arc<ContactRepository>,
        favorites: Arc<dyn FavoritesPersistence>,
    ) -> Result<Self, AppError> {
        let (command_tx, command_rx) = async_channel::bounded::<SessionCommand>(32);
        let (event_tx, event_rx) = async_channel::bounded::<SessionEvent>(64);

        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .map_err(|e| AppError::Task(format!("Failed to create Tokio runtime: {}", e)))?,
        );

        let view_model = {
            let _guard = runtime.enter();
            ContactsViewModel::new(repository, favorites)?
        };

        runtime.spawn(Self::run_session(view_model, command_rx, event_tx));

        Ok(Self {
            command_tx,
            event_rx,
            _runtime: runtime,
        })
    }

    async fn run_session(
        view_model: ContactsViewModel,
        command_rx: Receiver<SessionCommand>,
        event_tx: Sender<SessionEvent>,
    ) {
        let mut view_rx = view_model.subscribe();

        loop {
            tokio::select! {
                // Handle commands from the frontend
                cmd = command_rx.recv() => {
                    match cmd {
                        Ok(cmd) => Self::handle(&view_model, cmd).await,
                        Err(_) => break, // Channel closed
                    }
                }
                // Forward view changes to the frontend
                changed = view_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let event = {
                        let contacts = view_rx.borrow_and_update();
                        SessionEvent::ContactsChanged {
                            count: contacts.len(),
                            favorites: contacts.iter().filter(|c| c.is_favorite).count(),
                        }
                    };
                    // Nobody may be draining events; never stall the session on them
                    let _ = event_tx.try_send(event);
                }
            }
        }

        view_model.close();
        tracing::debug!("Session task finished");
    }

    async fn handle(view_model: &ContactsViewModel, cmd: SessionCommand) {
        match cmd {
            SessionCommand::ListContacts { query, reply } => {
                view_model.set_query(query);
                let _ = reply.send(view_model.grouped()).await;
            }
            SessionCommand::GetContact { id, reply } => {
                let _ = reply.send(view_model.contact(id)).await;
            }
            SessionCommand::ToggleFavorite { id, reply } => {
                let result = Self::handle_toggle_favorite(view_model, id).await;
                let _ = reply.send(result).await;
            }
            SessionCommand::DeleteContact { id, reply } => {
                let result = view_model
                    .contact(id)
                    .ok_or(AppError::ContactNotFound(id))
                    .map(|contact| {
                        view_model.delete_contact(&contact);
                        contact
                    });
                let _ = reply.send(result).await;
            }
            SessionCommand::UpdateContact { id, draft, reply } => {
                let result = Self::handle_update_contact(view_model, id, draft);
                let _ = reply.send(result).await;
            }
            SessionCommand::Refresh => {
                view_model.refresh_contacts();
            }
            SessionCommand::GetFavorites { reply } => {
                let _ = reply.send(view_model.favorites()).await;
            }
        }
    }

    async fn handle_toggle_favorite(view_model: &ContactsViewModel, id: u32) -> Result<Contact, AppError> {
        let contact = view_model
            .contact(id)
            .ok_or(AppError::ContactNotFound(id))?;
        view_model.toggle_favorite(&contact).await?;
        view_model
            .contact(id)
            .ok_or(AppError::ContactNotFound(id))
    }

    fn handle_update_contact(
        view_model: &ContactsViewModel,
        id: u32,
        draft: ContactDraft,
    ) -> Result<Contact, AppError> {
        let contact = view_model
            .contact(id)
            .ok_or(AppError::ContactNotFound(id))?;
        draft.validate()?;
        view_model.update_contact(draft.apply_to(&contact));
        view_model
            .contact(id)
            .ok_or(AppError::ContactNotFound(id))
    }

    /// Send a command and wait for its reply
    fn request<T>(&self, make: impl FnOnce(Sender<T>) -> SessionCommand) -> Result<T, AppError> {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        self.command_tx
            .send_blocking(make(reply_tx))
            .map_err(|_| AppError::SessionClosed)?;
        reply_rx.recv_blocking().map_err(|_| AppError::SessionClosed)
    }

    /// Sections of the contact list matching `query`
    pub fn list_contacts(&self, query: String) -> Result<GroupedContacts, AppError> {
        self.request(|reply| SessionCommand::ListContacts { query, reply })
    }

    pub fn get_contact(&self, id: u32) -> Result<Contact, AppError> {
        self.request(|reply| SessionCommand::GetContact { id, reply })?
            .ok_or(AppError::ContactNotFound(id))
    }

    /// Flip the favorite flag; returns the contact as now displayed
    pub fn toggle_favorite(&self, id: u32) -> Result<Contact, AppError> {
        self.request(|reply| SessionCommand::ToggleFavorite { id, reply })?
    }

    /// Delete a contact; returns the removed contact
    pub fn delete_contact(&self, id: u32) -> Result<Contact, AppError> {
        self.request(|reply| SessionCommand::DeleteContact { id, reply })?
    }

    pub fn update_contact(&self, id: u32, draft: ContactDraft) -> Result<Contact, AppError> {
        self.request(|reply| SessionCommand::UpdateContact { id, draft, reply })?
    }

    pub fn refresh(&self) -> Result<(), AppError> {
        self.command_tx
            .send_blocking(SessionCommand::Refresh)
            .map_err(|_| AppError::SessionClosed)
    }

    pub fn favorites(&self) -> Result<FavoriteSet, AppError> {
        self.request(|reply| SessionCommand::GetFavorites { reply })
    }

    /// Get event receiver for subscribing to session events
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardbook_core::FileFavoritesStore;
    use tempfile::TempDir;

    fn bridge(dir: &TempDir) -> SessionBridge {
        bridge_with(
            dir,
            vec![
                Contact::new(1, "Bob", "#2196F3"),
                Contact::new(2, "Ann", "#E91E63"),
                Contact::new(3, "Amy", "#4CAF50"),
            ],
        )
        .1
    }

    fn bridge_with(dir: &TempDir, contacts: Vec<Contact>) -> (Arc<ContactRepository>, SessionBridge) {
        let favorites = Arc::new(FileFavoritesStore::open(dir.path().join("prefs.json")));
        let repository = Arc::new(ContactRepository::new(contacts));
        let bridge = SessionBridge::new(repository.clone(), favorites).unwrap();
        (repository, bridge)
    }

    #[test]
    fn test_list_with_query() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        let grouped = bridge.list_contacts("a".to_string()).unwrap();
        let names: Vec<&str> = grouped["A"].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Ann"]);
        assert!(!grouped.contains_key("B"));
    }

    #[test]
    fn test_toggle_reorders_list() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        let bob = bridge.toggle_favorite(1).unwrap();
        assert!(bob.is_favorite);

        let grouped = bridge.list_contacts(String::new()).unwrap();
        assert_eq!(grouped.keys().next().map(String::as_str), Some("A"));
        assert!(grouped["B"][0].is_favorite);
        assert!(bridge.favorites().unwrap().contains("Bob"));

        assert!(!bridge.toggle_favorite(1).unwrap().is_favorite);
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        assert!(matches!(
            bridge.toggle_favorite(99),
            Err(AppError::ContactNotFound(99))
        ));
        assert!(matches!(
            bridge.get_contact(99),
            Err(AppError::ContactNotFound(99))
        ));
    }

    #[test]
    fn test_delete_then_get() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        assert_eq!(bridge.delete_contact(2).unwrap().name, "Ann");
        assert!(bridge.get_contact(2).is_err());
        assert!(bridge.delete_contact(2).is_err());
    }

    #[test]
    fn test_update_validates_draft() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        let mut draft = ContactDraft::from_contact(&bridge.get_contact(1).unwrap());
        draft.email = "broken".to_string();
        assert!(matches!(
            bridge.update_contact(1, draft.clone()),
            Err(AppError::Validation(_))
        ));

        draft.email = "bob@example.com".to_string();
        let updated = bridge.update_contact(1, draft).unwrap();
        assert_eq!(updated.email, "bob@example.com");
    }

    #[test]
    fn test_update_with_duplicate_ids_edits_shown_record() {
        let dir = TempDir::new().unwrap();
        let (repository, bridge) = bridge_with(
            &dir,
            vec![
                Contact::new(1, "Zed", "#111111"),
                Contact::new(1, "Amy", "#222222"),
            ],
        );

        let shown = bridge.get_contact(1).unwrap();
        let mut draft = ContactDraft::from_contact(&shown);
        draft.email = "someone@example.com".to_string();
        let updated = bridge.update_contact(1, draft).unwrap();
        assert_eq!(updated.name, shown.name);
        assert_eq!(updated.color_hex, shown.color_hex);

        let stored: Vec<(String, String)> = repository
            .snapshot()
            .into_iter()
            .map(|c| (c.name, c.email))
            .collect();
        assert_eq!(
            stored,
            vec![
                ("Zed".to_string(), "someone@example.com".to_string()),
                ("Amy".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_refresh_restores_samples() {
        let dir = TempDir::new().unwrap();
        let bridge = bridge(&dir);

        bridge.refresh().unwrap();
        let grouped = bridge.list_contacts(String::new()).unwrap();
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, cardbook_core::sample_contacts().len());
    }
}
