//! TUI rendering for Folio using ratatui.
//!
//! Layout, top to bottom: header bar (style follows the scroll phase), the
//! scrollable page body in a centered column, and a one-row status line.

mod input;
pub mod markdown;
mod page;
mod theme;

pub use input::{InputPump, handle_events};
pub use page::{MAX_PAGE_WIDTH, page_lines};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::border,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use folio_engine::{App, NoticeKind, ScrollOffset, ScrollPhase};
use folio_types::{StaticContent, sanitize_terminal_text};

/// Rows taken by the header bar.
pub const HEADER_HEIGHT: u16 = 3;

/// Width used for static output when no terminal width is known.
pub const DEFAULT_STATIC_WIDTH: u16 = 80;

const ASCII_AT_TOP: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

const ASCII_SCROLLED: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "=",
    horizontal_bottom: "=",
};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    draw_page(frame.buffer_mut(), area, app);
}

fn draw_page(buf: &mut Buffer, area: Rect, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    Block::default()
        .style(Style::default().bg(palette.bg_page))
        .render(area, buf);

    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let column = page_column(body_area);
    let lines = page_lines(app.content(), column.width, &palette, &glyphs);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(body_area.height);
    app.set_scroll_bounds(ScrollOffset::new(max_scroll), body_area.height);

    // Read after the bounds update: clamping a restored offset can cross the
    // threshold.
    let offset = app.scroll_offset().rows();
    let phase = app.scroll_phase();

    render_header(
        buf,
        header_area,
        app.content(),
        phase,
        &palette,
        &glyphs,
        options.ascii_only,
    );

    Paragraph::new(lines)
        .scroll((offset, 0))
        .render(column, buf);

    // Only render scrollbar when content exceeds viewport
    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some(glyphs.arrow_up))
            .end_symbol(Some(glyphs.arrow_down))
            .track_symbol(Some(glyphs.track))
            .thumb_symbol(glyphs.thumb)
            .style(Style::default().fg(palette.text_muted));

        // content_length = scrollable range, so the thumb reaches the bottom at max.
        let mut state =
            ScrollbarState::new(usize::from(max_scroll)).position(usize::from(offset));
        scrollbar.render(body_area, buf, &mut state);
    }

    render_status(buf, status_area, app, offset, max_scroll, &palette);
}

/// The centered text column inside the body area.
fn page_column(area: Rect) -> Rect {
    if area.width == 0 {
        return area;
    }
    // One spare column each side keeps the scrollbar off the text.
    let width = area.width.saturating_sub(2).clamp(1, MAX_PAGE_WIDTH);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Header bar: monogram on the left, the download control on the right.
/// Everything about its look is decided by `phase`.
fn render_header(
    buf: &mut Buffer,
    area: Rect,
    content: &StaticContent,
    phase: ScrollPhase,
    palette: &Palette,
    glyphs: &Glyphs,
    ascii_only: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::header_border(palette, phase))
        .style(styles::header(palette, phase));
    let block = match (phase, ascii_only) {
        (ScrollPhase::AtTop, false) => block.border_type(BorderType::Rounded),
        (ScrollPhase::Scrolled, false) => block.border_type(BorderType::Thick),
        (ScrollPhase::AtTop, true) => block.border_set(ASCII_AT_TOP),
        (ScrollPhase::Scrolled, true) => block.border_set(ASCII_SCROLLED),
    };
    let inner = block.inner(area);
    block.render(area, buf);

    let monogram = format!(
        " {} ",
        sanitize_terminal_text(content.profile.monogram.trim())
    );
    let monogram_width = u16::try_from(monogram.width()).unwrap_or(u16::MAX);
    let [left, right] =
        Layout::horizontal([Constraint::Length(monogram_width), Constraint::Min(0)])
            .areas(inner);

    Paragraph::new(Span::styled(monogram, styles::monogram(palette))).render(left, buf);

    let action = Line::from(vec![
        Span::styled(
            format!("{} Download CV", glyphs.download),
            Style::default().fg(palette.text_secondary),
        ),
        Span::raw(" "),
        Span::styled("[d]", styles::key_highlight(palette)),
    ])
    .right_aligned();
    Paragraph::new(action).render(right, buf);
}

fn render_status(
    buf: &mut Buffer,
    area: Rect,
    app: &App,
    offset: u16,
    max_scroll: u16,
    palette: &Palette,
) {
    let position = scroll_position_label(offset, max_scroll);
    let position_width = u16::try_from(position.width()).unwrap_or(u16::MAX);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(position_width + 1)])
            .areas(area);

    let line = if let Some(notice) = app.notice() {
        let style = match notice.kind {
            NoticeKind::Info => styles::accent(palette),
            NoticeKind::Error => styles::error(palette),
        };
        let ellipsis = if app.ui_options().ascii_only { "..." } else { "…" };
        let text = truncate_to_width(
            &sanitize_terminal_text(&notice.text),
            usize::from(left.width.saturating_sub(1)),
            ellipsis,
        );
        Line::from(Span::styled(format!(" {text}"), style))
    } else {
        let key = styles::key_highlight(palette);
        let hint = styles::key_hint(palette);
        Line::from(vec![
            Span::styled(" j/k", key),
            Span::styled(" scroll  ", hint),
            Span::styled("d", key),
            Span::styled(" download CV  ", hint),
            Span::styled("l", key),
            Span::styled(" LinkedIn  ", hint),
            Span::styled("q", key),
            Span::styled(" quit", hint),
        ])
    };
    Paragraph::new(line).render(left, buf);
    Paragraph::new(Line::from(Span::styled(position, styles::muted(palette))).right_aligned())
        .render(right, buf);
}

/// `Top`, `Bot`, `All` or a percentage, like a pager.
fn scroll_position_label(offset: u16, max_scroll: u16) -> String {
    match (offset, max_scroll) {
        (_, 0) => "All".to_string(),
        (0, _) => "Top".to_string(),
        (o, m) if o >= m => "Bot".to_string(),
        (o, m) => format!("{}%", u32::from(o) * 100 / u32::from(m)),
    }
}

fn truncate_to_width(text: &str, max: usize, ellipsis: &str) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(ellipsis.width());
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push_str(ellipsis);
    out
}

/// Render the whole page once as plain text, for output that is not an
/// interactive terminal.
///
/// The header is drawn for `app.scroll_phase()`, which is always `AtTop`
/// for an app built with `RenderContext::Static`.
#[must_use]
pub fn render_static(app: &App, width: u16) -> String {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let width = width.max(1);

    let column = page_column(Rect::new(0, HEADER_HEIGHT, width, 1));
    let lines = page_lines(app.content(), column.width, &palette, &glyphs);
    let body_height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .min(u16::MAX - HEADER_HEIGHT);

    let area = Rect::new(0, 0, width, HEADER_HEIGHT + body_height);
    let mut buf = Buffer::empty(area);
    render_header(
        &mut buf,
        Rect::new(0, 0, width, HEADER_HEIGHT),
        app.content(),
        app.scroll_phase(),
        &palette,
        &glyphs,
        options.ascii_only,
    );
    Paragraph::new(lines).render(
        Rect {
            height: body_height,
            ..column
        },
        &mut buf,
    );
    buffer_text(&buf)
}

/// Buffer contents as text, one row per line, trailing blanks trimmed.
#[must_use]
pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut row = String::new();
        let mut hidden = 0;
        for x in area.left()..area.right() {
            // Cells covered by a wide grapheme carry a placeholder.
            if hidden > 0 {
                hidden -= 1;
                continue;
            }
            let symbol = buf[(x, y)].symbol();
            hidden = symbol.width().saturating_sub(1);
            row.push_str(symbol);
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}
