//! Kiosk palettes
//!
//! The kiosk has one layout; only colors vary, selected by `[theme] name`.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Borders, active indicator, primary button
    pub accent: Color,
    /// Title text and the slip header
    pub highlight: Color,
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    /// Completed indicators and connectors
    pub done: Color,
    /// Slip paper
    pub slip_fg: Color,
    pub slip_bg: Color,
}

impl Theme {
    pub const CLINIC: Theme = Theme {
        name: "clinic",
        accent: Color::Rgb(70, 130, 180),
        highlight: Color::Rgb(218, 165, 32),
        text: Color::White,
        muted: Color::DarkGray,
        error: Color::Red,
        done: Color::Rgb(60, 179, 113),
        slip_fg: Color::Black,
        slip_bg: Color::Rgb(250, 250, 245),
    };

    pub const PAPER: Theme = Theme {
        name: "paper",
        accent: Color::Rgb(139, 90, 43),
        highlight: Color::Rgb(184, 134, 11),
        text: Color::Rgb(60, 47, 35),
        muted: Color::Rgb(150, 135, 115),
        error: Color::Rgb(178, 34, 34),
        done: Color::Rgb(107, 142, 35),
        slip_fg: Color::Rgb(60, 47, 35),
        slip_bg: Color::Rgb(245, 235, 215),
    };

    pub const MIDNIGHT: Theme = Theme {
        name: "midnight",
        accent: Color::Rgb(138, 43, 226),
        highlight: Color::Rgb(0, 206, 209),
        text: Color::Gray,
        muted: Color::Rgb(90, 90, 110),
        error: Color::LightRed,
        done: Color::Rgb(72, 209, 204),
        slip_fg: Color::White,
        slip_bg: Color::Rgb(25, 25, 45),
    };

    pub const ALL: [Theme; 3] = [Self::CLINIC, Self::PAPER, Self::MIDNIGHT];

    pub fn by_name(name: &str) -> Option<Theme> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Theme named in config; unknown names fall back to clinic
    pub fn from_config(config: &ThemeConfig) -> Theme {
        Self::by_name(&config.name).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using clinic", config.name);
            Self::CLINIC
        })
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn body(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn slip(&self) -> Style {
        Style::default().fg(self.slip_fg).bg(self.slip_bg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::CLINIC
    }
}
