//! Color themes shared by the terminal and DOM front ends.
//!
//! Colors are stored as plain RGB so the same palette can be turned into
//! ratatui colors or CSS custom properties.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Available color themes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Nord-inspired muted colors
    #[default]
    Nord,
    /// Amber CRT
    Amber,
    /// Green phosphor
    Green,
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "amber" | "amber-crt" => Ok(Theme::Amber),
            "green" | "green-phosphor" => Ok(Theme::Green),
            _ => Err(anyhow::anyhow!(
                "Unknown theme '{s}'. Available: nord, amber, green"
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::Amber => write!(f, "amber"),
            Theme::Green => write!(f, "green"),
        }
    }
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::Amber => ColorScheme::amber(),
            Theme::Green => ColorScheme::green(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    /// Page background
    pub panel: Rgb,
    /// Primary text
    pub text: Rgb,
    /// Secondary text (hints, footer)
    pub text_dim: Rgb,
    /// Page title and headings
    pub accent: Rgb,
    /// Tile border
    pub tile_border: Rgb,
    /// Border of the hovered tile and the active category
    pub focus: Rgb,
    /// Loading placeholder tiles
    pub skeleton: Rgb,
    /// Links (logo URL in tooltips)
    pub link: Rgb,
    /// Error heading and toast failures
    pub error: Rgb,
}

impl ColorScheme {
    pub fn nord() -> Self {
        Self {
            panel: Rgb(46, 52, 64),
            text: Rgb(236, 239, 244),
            text_dim: Rgb(180, 188, 204),
            accent: Rgb(136, 192, 208),
            tile_border: Rgb(129, 161, 193),
            focus: Rgb(235, 203, 139),
            skeleton: Rgb(76, 86, 106),
            link: Rgb(235, 203, 139),
            error: Rgb(255, 140, 140),
        }
    }

    pub fn amber() -> Self {
        Self {
            panel: Rgb(0, 0, 0),
            text: Rgb(255, 176, 0),
            text_dim: Rgb(200, 140, 0),
            accent: Rgb(255, 200, 100),
            tile_border: Rgb(180, 120, 0),
            focus: Rgb(255, 220, 150),
            skeleton: Rgb(60, 40, 0),
            link: Rgb(255, 220, 150),
            error: Rgb(255, 100, 100),
        }
    }

    pub fn green() -> Self {
        Self {
            panel: Rgb(0, 0, 0),
            text: Rgb(0, 255, 0),
            text_dim: Rgb(0, 190, 0),
            accent: Rgb(100, 255, 100),
            tile_border: Rgb(0, 180, 0),
            focus: Rgb(180, 255, 180),
            skeleton: Rgb(0, 50, 0),
            link: Rgb(180, 255, 180),
            error: Rgb(255, 110, 110),
        }
    }

    /// CSS custom properties for the DOM front end.
    pub fn to_css_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--ts-panel", self.panel.hex()),
            ("--ts-text", self.text.hex()),
            ("--ts-text-dim", self.text_dim.hex()),
            ("--ts-accent", self.accent.hex()),
            ("--ts-tile-border", self.tile_border.hex()),
            ("--ts-focus", self.focus.hex()),
            ("--ts-skeleton", self.skeleton.hex()),
            ("--ts-link", self.link.hex()),
            ("--ts-error", self.error.hex()),
        ]
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::nord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parsing() {
        assert_eq!("nord".parse::<Theme>().unwrap(), Theme::Nord);
        assert_eq!("NORD".parse::<Theme>().unwrap(), Theme::Nord);
        assert_eq!("amber-crt".parse::<Theme>().unwrap(), Theme::Amber);
        assert_eq!("green".parse::<Theme>().unwrap(), Theme::Green);
        assert!("invalid".parse::<Theme>().is_err());
    }

    #[test]
    fn css_vars_are_hex() {
        let vars = ColorScheme::nord().to_css_vars();
        assert_eq!(vars[0], ("--ts-panel", "#2e3440".to_string()));
        assert!(vars.iter().all(|(_, v)| v.len() == 7 && v.starts_with('#')));
    }
}
