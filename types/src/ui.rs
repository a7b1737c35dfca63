//! UI options shared by the engine (ownership) and the tui (rendering).

/// Display options derived from config and environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for icons.
    pub ascii_only: bool,
    /// Use the high-contrast palette.
    pub high_contrast: bool,
}
