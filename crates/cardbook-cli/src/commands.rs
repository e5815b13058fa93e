// SPDX-License-Identifier: AGPL-3.0
// Cardbook CLI - Command Handlers

use crate::state::AppState;
use cardbook_core::card::{CardFont, CardStyle, LogoShape, Orientation, TextAlignment};
use cardbook_core::share::contact_details_text;
use cardbook_core::{
    AppError, AppSettings, CardPreview, CardTemplate, Contact, ContactDraft, GroupedContacts,
    ShareIntent, ShareTarget, Theme,
};
use clap::{Args, Subcommand};

type CommandResult = Result<(), AppError>;

/// Width of the card drawing, inside its border
const CARD_WIDTH: usize = 36;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List contacts grouped by first letter
    List {
        /// Only show contacts whose name contains this text
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show one contact
    Show { id: u32 },
    /// Mark or unmark a contact as favorite
    Favorite { id: u32 },
    /// List the names stored as favorites
    Favorites,
    /// Edit a contact's details
    Edit {
        id: u32,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a contact for this session
    Delete { id: u32 },
    /// Reload the sample contacts
    Refresh,
    /// Print the share request for a contact
    Share {
        id: u32,
        /// message, email, system or clipboard
        #[arg(long, default_value = "system")]
        via: ShareTarget,
    },
    /// Print the dial, sms and email actions for a contact
    Actions { id: u32 },
    /// Preview a contact's business card
    Card {
        id: u32,
        #[command(flatten)]
        options: CardOptions,
    },
    /// Show or change application settings
    Settings {
        /// system, light or dark
        #[arg(long)]
        theme: Option<Theme>,
        /// Load the sample contacts when a session starts
        #[arg(long)]
        seed_samples: Option<bool>,
    },
    /// Run commands from stdin against one session
    Shell,
}

#[derive(Debug, Args, Default)]
pub struct EditFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditFields {
    fn apply(self, draft: &mut ContactDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(company) = self.company {
            draft.company = company;
        }
        if let Some(phone) = self.phone {
            draft.phone = phone;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
    }
}

#[derive(Debug, Args, Default)]
pub struct CardOptions {
    /// professional, modern or minimal
    #[arg(long)]
    pub style: Option<CardStyle>,
    /// Background color as #RRGGBB
    #[arg(long)]
    pub background: Option<String>,
    /// Text color as #RRGGBB
    #[arg(long)]
    pub text_color: Option<String>,
    /// default, sans, serif or mono
    #[arg(long)]
    pub font: Option<CardFont>,
    /// start, center or end
    #[arg(long)]
    pub align: Option<TextAlignment>,
    /// rectangle or circle
    #[arg(long)]
    pub logo: Option<LogoShape>,
    /// portrait or landscape
    #[arg(long)]
    pub orientation: Option<Orientation>,
    /// Keep these choices as the default template
    #[arg(long)]
    pub save: bool,
}

impl CardOptions {
    fn apply(&self, template: CardTemplate) -> Result<CardTemplate, AppError> {
        let mut template = template;
        if let Some(style) = self.style {
            template.style = style;
        }
        if let Some(color) = &self.background {
            template = template.with_background(color)?;
        }
        if let Some(color) = &self.text_color {
            template = template.with_text_color(color)?;
        }
        if let Some(font) = self.font {
            template.font = font;
        }
        if let Some(align) = self.align {
            template.alignment = align;
        }
        if let Some(logo) = self.logo {
            template.logo_shape = logo;
        }
        if let Some(orientation) = self.orientation {
            template.orientation = orientation;
        }
        Ok(template)
    }
}

/// Run one command against the session
pub fn execute(state: &AppState, command: Command, json: bool) -> CommandResult {
    match command {
        Command::List { query } => list(state, query, json),
        Command::Show { id } => show(state, id, json),
        Command::Favorite { id } => favorite(state, id),
        Command::Favorites => favorites(state),
        Command::Edit { id, fields } => edit(state, id, fields),
        Command::Delete { id } => delete(state, id),
        Command::Refresh => {
            state.bridge.refresh()?;
            println!("Contacts reloaded");
            Ok(())
        }
        Command::Share { id, via } => share(state, id, via),
        Command::Actions { id } => actions(state, id),
        Command::Card { id, options } => card(state, id, options, json),
        Command::Settings {
            theme,
            seed_samples,
        } => settings(state, theme, seed_samples, json),
        Command::Shell => Err(AppError::InvalidConfig(
            "Already running a shell".to_string(),
        )),
    }
}

fn list(state: &AppState, query: String, json: bool) -> CommandResult {
    let grouped = state.bridge.list_contacts(query)?;
    if json {
        return print_json(&grouped);
    }

    if grouped.is_empty() {
        println!("No contacts found");
        return Ok(());
    }
    print!("{}", format_groups(&grouped));
    Ok(())
}

fn show(state: &AppState, id: u32, json: bool) -> CommandResult {
    let contact = state.bridge.get_contact(id)?;
    if json {
        return print_json(&contact);
    }

    println!("[{}] {}", contact.initials(), favorite_label(&contact));
    println!("{}", contact_details_text(&contact));
    Ok(())
}

fn favorite(state: &AppState, id: u32) -> CommandResult {
    let contact = state.bridge.toggle_favorite(id)?;
    if contact.is_favorite {
        println!("{} is now a favorite", contact.name);
    } else {
        println!("{} is no longer a favorite", contact.name);
    }
    Ok(())
}

fn favorites(state: &AppState) -> CommandResult {
    let favorites = state.bridge.favorites()?;
    if favorites.is_empty() {
        println!("No favorites yet");
    }
    for name in favorites {
        println!("★ {}", name);
    }
    Ok(())
}

fn edit(state: &AppState, id: u32, fields: EditFields) -> CommandResult {
    let contact = state.bridge.get_contact(id)?;
    let mut draft = ContactDraft::from_contact(&contact);
    fields.apply(&mut draft);

    let updated = state.bridge.update_contact(id, draft)?;
    println!("Updated {}", updated.name);
    Ok(())
}

fn delete(state: &AppState, id: u32) -> CommandResult {
    let removed = state.bridge.delete_contact(id)?;
    println!("Deleted {}", removed.name);
    Ok(())
}

fn share(state: &AppState, id: u32, via: ShareTarget) -> CommandResult {
    let contact = state.bridge.get_contact(id)?;
    tracing::info!("{} for {}", via.title(), contact.name);
    print_json(&ShareIntent::share(&contact, via))
}

fn actions(state: &AppState, id: u32) -> CommandResult {
    let contact = state.bridge.get_contact(id)?;
    let mut intents = Vec::new();
    if !contact.phone.is_empty() {
        intents.push(ShareIntent::dial(&contact.phone));
        intents.push(ShareIntent::sms(&contact.phone));
    }
    if !contact.email.is_empty() {
        intents.push(ShareIntent::email(&contact));
    }
    print_json(&intents)
}

fn card(state: &AppState, id: u32, options: CardOptions, json: bool) -> CommandResult {
    let contact = state.bridge.get_contact(id)?;
    let template = options.apply(state.settings.get().card_template)?;

    if options.save {
        state.settings.set_card_template(template.clone())?;
        tracing::info!("Saved card template");
    }

    let preview = CardPreview::render(&template, &contact);
    if json {
        return print_json(&preview);
    }
    println!("{}", preview.to_text(CARD_WIDTH));
    println!(
        "{} · {} on {} · {} font · {}",
        template.style,
        template.text_color,
        template.background_color,
        template.font,
        template.orientation
    );
    Ok(())
}

fn settings(
    state: &AppState,
    theme: Option<Theme>,
    seed_samples: Option<bool>,
    json: bool,
) -> CommandResult {
    let current = state.settings.get();
    let updated = with_changes(&current, theme, seed_samples);
    if updated != current {
        state.settings.update(updated.clone())?;
    }

    if json {
        return print_json(&updated);
    }
    println!("theme: {}", updated.theme);
    println!("seed sample contacts: {}", updated.seed_sample_contacts);
    println!("card style: {}", updated.card_template.style);
    Ok(())
}

fn with_changes(settings: &AppSettings, theme: Option<Theme>, seed_samples: Option<bool>) -> AppSettings {
    let mut settings = settings.clone();
    if let Some(theme) = theme {
        settings.theme = theme;
    }
    if let Some(seed) = seed_samples {
        settings.seed_sample_contacts = seed;
    }
    settings
}

fn favorite_label(contact: &Contact) -> &'static str {
    if contact.is_favorite {
        "★ favorite"
    } else {
        "☆"
    }
}

/// Sections as printed by `list`
pub fn format_groups(grouped: &GroupedContacts) -> String {
    let mut out = String::new();
    for (key, contacts) in grouped {
        out.push_str(key);
        out.push('\n');
        for contact in contacts {
            let star = if contact.is_favorite { '★' } else { ' ' };
            out.push_str(&format!("  {} {:>3}  {}", star, contact.id, contact.name));
            if !contact.company.is_empty() {
                out.push_str(&format!("  ({})", contact.company));
            }
            out.push('\n');
        }
    }
    out
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
