// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Business card templates
//
// A template is the set of choices made on the card customization screen.
// CardPreview turns a template and a contact into a layout any frontend can
// draw.

use crate::contact::Contact;
use crate::types::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Background colors offered by the customization screen
pub const CARD_COLORS: [&str; 17] = [
    "#FFFFFF", "#2196F3", "#4CAF50", "#9C27B0", "#FF9800", "#6650A4", "#E91E63", "#009688",
    "#FF5722", "#607D8B", "#795548", "#3F51B5", "#00BCD4", "#8BC34A", "#FFC107", "#9E9E9E",
    "#000000",
];

/// Text colors offered by the customization screen
pub const TEXT_COLORS: [&str; 16] = [
    "#000000", "#FFFFFF", "#2196F3", "#00008B", "#4B0082", "#800000", "#8B0000", "#006400",
    "#808000", "#708090", "#2F4F4F", "#FF4500", "#DAA520", "#800080", "#A52A2A", "#DC143C",
];

/// Width over height of a card; landscape keeps it and rotates the card
pub const CARD_ASPECT_RATIO: f32 = 1.3;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "Unknown {}: {}",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

named_enum!(
    /// Overall card layout
    CardStyle { Professional => "professional", Modern => "modern", Minimal => "minimal" }
);

named_enum!(
    /// Font family for all card text
    CardFont { Default => "default", Sans => "sans", Serif => "serif", Mono => "mono" }
);

named_enum!(
    TextAlignment { Start => "start", Center => "center", End => "end" }
);

named_enum!(
    LogoShape { Rectangle => "rectangle", Circle => "circle" }
);

named_enum!(
    Orientation { Portrait => "portrait", Landscape => "landscape" }
);

/// Customization choices for a business card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    #[serde(default)]
    pub style: CardStyle,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default)]
    pub font: CardFont,
    #[serde(default)]
    pub alignment: TextAlignment,
    #[serde(default)]
    pub logo_shape: LogoShape,
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_background() -> String {
    CARD_COLORS[0].to_string()
}

fn default_text_color() -> String {
    TEXT_COLORS[0].to_string()
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self {
            style: CardStyle::default(),
            background_color: default_background(),
            text_color: default_text_color(),
            font: CardFont::default(),
            alignment: TextAlignment::default(),
            logo_shape: LogoShape::default(),
            orientation: Orientation::default(),
        }
    }
}

impl CardTemplate {
    pub fn with_background(mut self, color: &str) -> Result<Self, AppError> {
        self.background_color = normalize_color(color)?;
        Ok(self)
    }

    pub fn with_text_color(mut self, color: &str) -> Result<Self, AppError> {
        self.text_color = normalize_color(color)?;
        Ok(self)
    }
}

/// Accepts `#RRGGBB` (or `RRGGBB`) and returns it uppercased with the `#`
pub fn normalize_color(color: &str) -> Result<String, AppError> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(format!(
            "Color must be #RRGGBB: {}",
            color
        )));
    }
    Ok(format!("#{}", hex.to_ascii_uppercase()))
}

/// One line of text on the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLine {
    pub text: String,
    pub bold: bool,
}

/// Layout of a card ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub template: CardTemplate,
    /// Text drawn inside the logo area; minimal cards have no logo
    pub logo_text: Option<String>,
    pub lines: Vec<CardLine>,
    pub rounded_corners: bool,
    pub aspect_ratio: f32,
    /// Clockwise rotation applied to the whole card, in degrees
    pub rotation: u16,
}

impl CardPreview {
    pub fn render(template: &CardTemplate, contact: &Contact) -> Self {
        let mut lines = Vec::new();
        let mut push = |text: &str, bold: bool| {
            if !text.is_empty() {
                lines.push(CardLine {
                    text: text.to_string(),
                    bold,
                });
            }
        };

        match template.style {
            CardStyle::Professional => {
                push(&contact.name, true);
                push(&contact.company, false);
                push(&contact.email, false);
                push(&contact.phone, false);
            }
            CardStyle::Modern => {
                push(&contact.name.to_uppercase(), true);
                push(&contact.company.to_uppercase(), false);
                push(&contact.email, false);
                push(&contact.phone, false);
            }
            CardStyle::Minimal => {
                push(&contact.name, true);
                push(&contact.company, false);
                push(&contact.email, false);
                push(&contact.phone, false);
            }
        }

        let rotation = match template.orientation {
            Orientation::Portrait => 0,
            Orientation::Landscape => 90,
        };
        let logo_text = match template.style {
            CardStyle::Minimal => None,
            _ => Some(contact.initials()),
        };

        Self {
            template: template.clone(),
            logo_text,
            lines,
            rounded_corners: template.style != CardStyle::Professional,
            aspect_ratio: CARD_ASPECT_RATIO,
            rotation,
        }
    }

    /// Plain-text drawing of the card, `width` characters wide inside the border
    pub fn to_text(&self, width: usize) -> String {
        let (top, bottom) = if self.rounded_corners {
            (('╭', '╮'), ('╰', '╯'))
        } else {
            (('┌', '┐'), ('└', '┘'))
        };

        let border = "─".repeat(width);
        let mut out = Vec::with_capacity(self.lines.len() + 4);
        out.push(format!("{}{}{}", top.0, border, top.1));
        if let Some(initials) = &self.logo_text {
            let logo = match self.template.logo_shape {
                LogoShape::Rectangle => format!("[{}]", initials),
                LogoShape::Circle => format!("({})", initials),
            };
            out.push(self.framed(&logo, width));
        }
        for line in &self.lines {
            out.push(self.framed(&line.text, width));
        }
        out.push(format!("{}{}{}", bottom.0, border, bottom.1));
        out.join("\n")
    }

    fn framed(&self, text: &str, width: usize) -> String {
        let text: String = text.chars().take(width).collect();
        let padding = width - text.chars().count();
        let (left, right) = match self.template.alignment {
            TextAlignment::Start => (0, padding),
            TextAlignment::Center => (padding / 2, padding - padding / 2),
            TextAlignment::End => (padding, 0),
        };
        format!("│{}{}{}│", " ".repeat(left), text, " ".repeat(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Contact {
        Contact::new(1, "Ann Lee", "#E91E63")
            .with_company("Nimbus")
            .with_email("ann@nimbus.io")
    }

    #[test]
    fn test_default_template() {
        let template = CardTemplate::default();
        assert_eq!(template.style, CardStyle::Professional);
        assert_eq!(template.background_color, "#FFFFFF");
        assert_eq!(template.text_color, "#000000");
        assert_eq!(template.logo_shape, LogoShape::Rectangle);
        assert_eq!(template.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_color_validation() {
        let template = CardTemplate::default().with_background("2196f3").unwrap();
        assert_eq!(template.background_color, "#2196F3");
        assert!(CardTemplate::default().with_text_color("#12345").is_err());
        assert!(CardTemplate::default().with_text_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_enum_names() {
        assert_eq!("Serif".parse::<CardFont>().unwrap(), CardFont::Serif);
        assert_eq!(TextAlignment::Center.to_string(), "center");
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_render_styles() {
        let professional = CardPreview::render(&CardTemplate::default(), &ann());
        assert_eq!(professional.logo_text.as_deref(), Some("AL"));
        assert!(!professional.rounded_corners);
        assert_eq!(professional.lines.len(), 3);
        assert!(professional.lines[0].bold);

        let modern = CardTemplate {
            style: CardStyle::Modern,
            ..Default::default()
        };
        let preview = CardPreview::render(&modern, &ann());
        assert_eq!(preview.lines[0].text, "ANN LEE");
        assert!(preview.rounded_corners);

        let minimal = CardTemplate {
            style: CardStyle::Minimal,
            orientation: Orientation::Landscape,
            ..Default::default()
        };
        let preview = CardPreview::render(&minimal, &ann().with_phone("555-0100"));
        let texts: Vec<&str> = preview.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Ann Lee", "Nimbus", "ann@nimbus.io", "555-0100"]);
        assert_eq!(preview.logo_text, None);
        assert_eq!(preview.rotation, 90);
    }

    #[test]
    fn test_orientation_keeps_aspect_ratio() {
        let portrait = CardPreview::render(&CardTemplate::default(), &ann());
        let landscape = CardPreview::render(
            &CardTemplate {
                orientation: Orientation::Landscape,
                ..Default::default()
            },
            &ann(),
        );
        assert_eq!(portrait.aspect_ratio, 1.3);
        assert_eq!(landscape.aspect_ratio, portrait.aspect_ratio);
        assert_eq!(portrait.rotation, 0);
        assert_eq!(landscape.rotation, 90);
    }

    #[test]
    fn test_minimal_text_has_no_logo() {
        let template = CardTemplate {
            style: CardStyle::Minimal,
            ..Default::default()
        };
        let text = CardPreview::render(&template, &ann()).to_text(12);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "│Ann Lee     │");
        assert!(!text.contains("[AL]"));
    }

    #[test]
    fn test_text_alignment() {
        let template = CardTemplate {
            alignment: TextAlignment::End,
            logo_shape: LogoShape::Circle,
            ..Default::default()
        };
        let text = CardPreview::render(&template, &ann()).to_text(10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "│      (AL)│");
        assert_eq!(lines[2], "│   Ann Lee│");
    }

    #[test]
    fn test_template_serde_defaults() {
        let template: CardTemplate = serde_json::from_str(r#"{"style":"modern"}"#).unwrap();
        assert_eq!(template.style, CardStyle::Modern);
        assert_eq!(template.background_color, "#FFFFFF");
    }
}
