//! Terminal text sanitization.
//!
//! Content can be loaded from a user-supplied file, so every string is
//! scrubbed before it reaches the terminal. Escape sequences could otherwise
//! move the cursor, retitle the window, write the clipboard (OSC 52) or plant
//! deceptive hyperlinks (OSC 8).

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

/// Where the scanner is inside a (possibly unterminated) escape sequence.
#[derive(Clone, Copy)]
enum Scan {
    Text,
    /// Just saw ESC.
    Escape,
    /// CSI parameters until a final byte in `@..=~`.
    Csi,
    /// OSC/DCS/SOS/PM/APC string until BEL or ESC `\`.
    String,
    /// ESC inside a string; `\` terminates it.
    StringEscape,
}

/// Strip escape sequences and control characters, keeping `\n`, `\t`, `\r`.
///
/// Returns `Cow::Borrowed` when nothing needed removing.
///
/// ```
/// use folio_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("plain"), "plain");
/// assert_eq!(sanitize_terminal_text("a\x1b[2Jb"), "ab");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_rejected) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut scan = Scan::Text;
    for c in input.chars() {
        scan = match (scan, c) {
            (Scan::Text, ESC) => Scan::Escape,
            (Scan::Text, C1_CSI) => Scan::Csi,
            (Scan::Text, c) => {
                if !is_rejected(c) {
                    out.push(c);
                }
                Scan::Text
            }
            (Scan::Escape, '[') => Scan::Csi,
            (Scan::Escape, ']' | 'P' | 'X' | '^' | '_') => Scan::String,
            // Two-character sequences (ESC 7, ESC c, ...).
            (Scan::Escape, _) => Scan::Text,
            (Scan::Csi, '\u{40}'..='\u{7e}') => Scan::Text,
            (Scan::Csi, _) => Scan::Csi,
            (Scan::String, BEL) => Scan::Text,
            (Scan::String, ESC) => Scan::StringEscape,
            (Scan::String, _) => Scan::String,
            (Scan::StringEscape, '\\') => Scan::Text,
            (Scan::StringEscape, _) => Scan::String,
        };
    }
    Cow::Owned(out)
}

fn is_rejected(c: char) -> bool {
    let c0 = c <= '\x1f' && !matches!(c, '\n' | '\t' | '\r');
    let c1 = ('\u{80}'..='\u{9f}').contains(&c);
    c0 || c1 || c == '\x7f'
}
