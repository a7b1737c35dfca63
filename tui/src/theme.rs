//! Color theme and glyphs for Folio.
//!
//! Slate grays with a cyan accent by default, with an optional high-contrast
//! override.

use ratatui::style::{Color, Modifier, Style};

use folio_types::{ScrollPhase, UiOptions};

mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_PAGE: Color = Color::Rgb(17, 24, 39); // gray-900
    pub const BG_PANEL: Color = Color::Rgb(31, 41, 55); // gray-800
    pub const BG_BADGE: Color = Color::Rgb(55, 65, 81); // gray-700
    pub const BG_SHADE: Color = Color::Rgb(12, 17, 28);

    // === Borders ===
    pub const BORDER: Color = Color::Rgb(55, 65, 81); // gray-700
    pub const BORDER_SOFT: Color = Color::Rgb(75, 85, 99); // gray-600

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color = Color::Rgb(209, 213, 219); // gray-300
    pub const TEXT_MUTED: Color = Color::Rgb(156, 163, 175); // gray-400

    // === Accent ===
    pub const ACCENT: Color = Color::Rgb(6, 182, 212); // cyan-500
    pub const ACCENT_BRIGHT: Color = Color::Rgb(34, 211, 238); // cyan-400
    pub const ON_ACCENT: Color = Color::Rgb(17, 24, 39);

    pub const ERROR: Color = Color::Rgb(248, 113, 113); // red-400
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_page: Color,
    pub bg_panel: Color,
    pub bg_badge: Color,
    pub bg_shade: Color,
    pub border: Color,
    pub border_soft: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub accent_bright: Color,
    pub on_accent: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_page: colors::BG_PAGE,
            bg_panel: colors::BG_PANEL,
            bg_badge: colors::BG_BADGE,
            bg_shade: colors::BG_SHADE,
            border: colors::BORDER,
            border_soft: colors::BORDER_SOFT,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            accent: colors::ACCENT,
            accent_bright: colors::ACCENT_BRIGHT,
            on_accent: colors::ON_ACCENT,
            error: colors::ERROR,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_page: Color::Black,
            bg_panel: Color::Black,
            bg_badge: Color::DarkGray,
            bg_shade: Color::Black,
            border: Color::Gray,
            border_soft: Color::White,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            accent: Color::Cyan,
            accent_bright: Color::LightCyan,
            on_accent: Color::Black,
            error: Color::LightRed,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons, card frames and the scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub download: &'static str,
    pub link: &'static str,
    pub star: &'static str,
    pub separator: &'static str,
    pub arrow_up: &'static str,
    pub arrow_down: &'static str,
    pub track: &'static str,
    pub thumb: &'static str,
    pub frame: Frame,
}

/// Box-drawing set for the page cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
}

const FRAME_ROUNDED: Frame = Frame {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    horizontal: "─",
    vertical: "│",
};

const FRAME_ASCII: Frame = Frame {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    horizontal: "-",
    vertical: "|",
};

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            download: "v",
            link: "->",
            star: "*",
            separator: "-",
            arrow_up: "^",
            arrow_down: "v",
            track: "|",
            thumb: "#",
            frame: FRAME_ASCII,
        }
    } else {
        Glyphs {
            download: "↓",
            link: "↗",
            star: "★",
            separator: "·",
            arrow_up: "↑",
            arrow_down: "↓",
            track: "│",
            thumb: "█",
            frame: FRAME_ROUNDED,
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, ScrollPhase, Style};

    /// Header surface: lighter panel at the top of the page, darker once the
    /// body has scrolled under it.
    #[must_use]
    pub fn header(palette: &Palette, phase: ScrollPhase) -> Style {
        match phase {
            ScrollPhase::AtTop => Style::default().bg(palette.bg_panel),
            ScrollPhase::Scrolled => Style::default().bg(palette.bg_shade),
        }
    }

    #[must_use]
    pub fn header_border(palette: &Palette, phase: ScrollPhase) -> Style {
        match phase {
            ScrollPhase::AtTop => Style::default().fg(palette.border),
            ScrollPhase::Scrolled => Style::default().fg(palette.accent),
        }
    }

    #[must_use]
    pub fn monogram(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.on_accent)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn greeting(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent_bright)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn heading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn prose(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    /// `**strong**` inside prose.
    #[must_use]
    pub fn strong(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// `**strong**` inside the hero intro: a highlighter mark.
    #[must_use]
    pub fn highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.on_accent)
            .bg(palette.accent_bright)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn accent(palette: &Palette) -> Style {
        Style::default().fg(palette.accent_bright)
    }

    #[must_use]
    pub fn badge(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_secondary)
            .bg(palette.bg_badge)
    }

    #[must_use]
    pub fn featured_badge(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.on_accent)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn card_border(palette: &Palette, featured: bool) -> Style {
        if featured {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.border)
        }
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent_bright)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn error(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use folio_types::{ScrollPhase, UiOptions};

    use super::{Palette, glyphs, palette, styles};

    #[test]
    fn high_contrast_option_selects_palette() {
        let options = UiOptions {
            ascii_only: false,
            high_contrast: true,
        };
        assert_eq!(palette(options), Palette::high_contrast());
        assert_eq!(palette(UiOptions::default()), Palette::standard());
    }

    #[test]
    fn ascii_glyphs_are_ascii() {
        let options = UiOptions {
            ascii_only: true,
            high_contrast: false,
        };
        let glyphs = glyphs(options);
        for glyph in [
            glyphs.download,
            glyphs.link,
            glyphs.star,
            glyphs.separator,
            glyphs.track,
            glyphs.thumb,
            glyphs.frame.top_left,
            glyphs.frame.horizontal,
            glyphs.frame.vertical,
        ] {
            assert!(glyph.is_ascii(), "{glyph:?} is not ascii");
        }
    }

    #[test]
    fn header_styles_differ_by_phase() {
        for palette in [Palette::standard(), Palette::high_contrast()] {
            assert_ne!(
                styles::header_border(&palette, ScrollPhase::AtTop),
                styles::header_border(&palette, ScrollPhase::Scrolled)
            );
        }
    }
}
