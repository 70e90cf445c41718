use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Detect theme mode from the environment
    pub fn detect() -> Self {
        // 1. Check explicit override via USERPICK_THEME env var
        if let Ok(theme) = std::env::var("USERPICK_THEME") {
            match theme.to_lowercase().as_str() {
                "light" => return Self::Light,
                "dark" => return Self::Dark,
                _ => {}
            }
        }

        // 2. Check COLORFGBG env var (format: "fg;bg")
        if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
            if let Some(mode) = Self::parse_colorfgbg(&colorfgbg) {
                return mode;
            }
        }

        // Default to dark
        Self::Dark
    }

    /// Parse a COLORFGBG value. Background colors 0-8 are typically dark,
    /// 7 and 9+ are light.
    fn parse_colorfgbg(value: &str) -> Option<Self> {
        let bg = value.split(';').next_back()?;
        let bg_num: u8 = bg.trim().parse().ok()?;
        if bg_num > 8 || bg_num == 7 {
            Some(Self::Light)
        } else {
            Some(Self::Dark)
        }
    }
}

/// Application configuration
pub struct Config {
    pub colors: Colors,
    pub timing: Timing,
    pub theme: ThemeMode,
}

impl Default for Config {
    fn default() -> Self {
        let theme = ThemeMode::detect();
        Self {
            colors: Colors::for_theme(theme),
            timing: Timing::default(),
            theme,
        }
    }
}

/// Color palette - adapts to theme
pub struct Colors {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub hover_bg: Color,
    pub status_bar: Color,
    pub status_bar_text: Color,
}

impl Colors {
    /// Create colors for the given theme
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Dark theme (Catppuccin Mocha inspired)
    pub fn dark() -> Self {
        Self {
            text: Color::Rgb(205, 214, 244),           // Text
            muted: Color::Rgb(108, 112, 134),          // Overlay0
            accent: Color::Rgb(137, 180, 250),         // Blue
            border: Color::Rgb(69, 71, 90),            // Surface1
            border_focused: Color::Rgb(137, 180, 250), // Blue
            hover_bg: Color::Rgb(49, 50, 68),          // Surface0
            status_bar: Color::Rgb(49, 50, 68),        // Surface0
            status_bar_text: Color::Rgb(205, 214, 244), // Text
        }
    }

    /// Light theme (high contrast for light backgrounds)
    pub fn light() -> Self {
        Self {
            text: Color::Rgb(10, 10, 15),              // Almost black
            muted: Color::Rgb(60, 60, 70),             // Dark gray
            accent: Color::Rgb(0, 60, 180),            // Dark blue
            border: Color::Rgb(150, 155, 170),         // Visible border
            border_focused: Color::Rgb(0, 60, 180),    // Dark blue
            hover_bg: Color::Rgb(220, 225, 235),       // Light surface
            status_bar: Color::Rgb(220, 225, 235),     // Light surface
            status_bar_text: Color::Rgb(10, 10, 15),   // Almost black
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::for_theme(ThemeMode::detect())
    }
}

impl Colors {
    pub fn style_text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn style_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn style_header(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn style_selected(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn style_hover(&self) -> Style {
        Style::default().bg(self.hover_bg).fg(self.text)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn style_status_bar(&self) -> Style {
        Style::default()
            .bg(self.status_bar)
            .fg(self.status_bar_text)
    }
}

pub struct Timing {
    pub tick_rate: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }
}
