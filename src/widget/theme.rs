//! Theme tokens for the widget
//!
//! The theme is derived state: it is recomputed from the configured colour
//! scheme, never edited directly. A colour scheme is either a preset name
//! (`nord`, `dracula`, ...) or a `#rrggbb` accent colour laid over the
//! default palette.

use ratatui::style::Color;
use std::str::FromStr;

/// Built-in palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreset {
    #[default]
    CatppuccinMocha,
    Nord,
    Dracula,
    TokyoNight,
}

impl FromStr for ThemePreset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "catppuccin" | "catppuccin-mocha" => Ok(Self::CatppuccinMocha),
            "nord" => Ok(Self::Nord),
            "dracula" => Ok(Self::Dracula),
            "tokyo-night" | "tokyonight" => Ok(Self::TokyoNight),
            _ => Err(()),
        }
    }
}

/// Theme tokens handed to every view and plugin
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Surfaces
    pub bg_main: Color,
    pub bg_header: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,

    // Text
    pub text_primary: Color,
    pub text_muted: Color,

    /// Primary brand colour (header, toggle, badges)
    pub accent: Color,
    /// Text drawn on top of `accent`
    pub accent_contrast: Color,

    // Message colours
    pub user_bubble: Color,
    pub bot_bubble: Color,
    pub agent_bubble: Color,
    pub system_fg: Color,

    // Status
    pub error: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha (default)
    pub fn catppuccin_mocha() -> Self {
        Self {
            bg_main: Color::Rgb(30, 30, 46),
            bg_header: Color::Rgb(24, 24, 37),

            border: Color::Rgb(49, 50, 68),
            border_focused: Color::Rgb(137, 180, 250),

            text_primary: Color::Rgb(205, 214, 244),
            text_muted: Color::Rgb(108, 112, 134),

            accent: Color::Rgb(137, 180, 250),
            accent_contrast: Color::Rgb(17, 17, 27),

            user_bubble: Color::Rgb(137, 180, 250),
            bot_bubble: Color::Rgb(166, 227, 161),
            agent_bubble: Color::Rgb(203, 166, 247),
            system_fg: Color::Rgb(148, 226, 213),

            error: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(249, 226, 175),
        }
    }

    /// Nord
    pub fn nord() -> Self {
        Self {
            bg_main: Color::Rgb(46, 52, 64),   // nord0
            bg_header: Color::Rgb(59, 66, 82), // nord1

            border: Color::Rgb(76, 86, 106),           // nord3
            border_focused: Color::Rgb(136, 192, 208), // nord8

            text_primary: Color::Rgb(236, 239, 244), // nord6
            text_muted: Color::Rgb(143, 157, 179),

            accent: Color::Rgb(136, 192, 208),
            accent_contrast: Color::Rgb(46, 52, 64),

            user_bubble: Color::Rgb(129, 161, 193),  // nord9
            bot_bubble: Color::Rgb(163, 190, 140),   // nord14
            agent_bubble: Color::Rgb(180, 142, 173), // nord15
            system_fg: Color::Rgb(136, 192, 208),

            error: Color::Rgb(191, 97, 106),    // nord11
            warning: Color::Rgb(235, 203, 139), // nord13
        }
    }

    /// Dracula
    pub fn dracula() -> Self {
        Self {
            bg_main: Color::Rgb(40, 42, 54),
            bg_header: Color::Rgb(33, 34, 44),

            border: Color::Rgb(68, 71, 90),
            border_focused: Color::Rgb(189, 147, 249),

            text_primary: Color::Rgb(248, 248, 242),
            text_muted: Color::Rgb(98, 114, 164),

            accent: Color::Rgb(189, 147, 249),
            accent_contrast: Color::Rgb(40, 42, 54),

            user_bubble: Color::Rgb(189, 147, 249),
            bot_bubble: Color::Rgb(80, 250, 123),
            agent_bubble: Color::Rgb(255, 121, 198),
            system_fg: Color::Rgb(139, 233, 253),

            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(241, 250, 140),
        }
    }

    /// Tokyo Night
    pub fn tokyo_night() -> Self {
        Self {
            bg_main: Color::Rgb(26, 27, 38),
            bg_header: Color::Rgb(22, 22, 30),

            border: Color::Rgb(41, 46, 66),
            border_focused: Color::Rgb(122, 162, 247),

            text_primary: Color::Rgb(192, 202, 245),
            text_muted: Color::Rgb(86, 95, 137),

            accent: Color::Rgb(122, 162, 247),
            accent_contrast: Color::Rgb(22, 22, 30),

            user_bubble: Color::Rgb(122, 162, 247),
            bot_bubble: Color::Rgb(158, 206, 106),
            agent_bubble: Color::Rgb(187, 154, 247),
            system_fg: Color::Rgb(125, 207, 255),

            error: Color::Rgb(247, 118, 142),
            warning: Color::Rgb(224, 175, 104),
        }
    }

    /// Get theme from preset
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::CatppuccinMocha => Self::catppuccin_mocha(),
            ThemePreset::Nord => Self::nord(),
            ThemePreset::Dracula => Self::dracula(),
            ThemePreset::TokyoNight => Self::tokyo_night(),
        }
    }

    /// Derive the theme for a configured colour scheme
    ///
    /// Unknown or malformed schemes fall back to the default palette.
    pub fn from_color_scheme(scheme: Option<&str>) -> Self {
        let Some(scheme) = scheme.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        if let Ok(preset) = scheme.parse::<ThemePreset>() {
            return Self::from_preset(preset);
        }

        match parse_hex_color(scheme) {
            Some(accent) => Self::default().with_accent(accent),
            None => {
                tracing::warn!(scheme, "Unrecognised color scheme, using default theme");
                Self::default()
            }
        }
    }

    /// Lay an accent colour over this palette
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self.border_focused = accent;
        self.user_bubble = accent;
        self.accent_contrast = contrast_for(accent);
        self
    }
}

/// Parse a `#rrggbb` colour
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Black or white, whichever reads better on `color`
fn contrast_for(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            // ITU-R BT.601 luma
            let luma = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
            if luma > 128_000 {
                Color::Rgb(0, 0, 0)
            } else {
                Color::Rgb(255, 255, 255)
            }
        }
        _ => Color::Reset,
    }
}
