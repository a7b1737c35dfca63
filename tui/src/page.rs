//! Page body layout.
//!
//! The body is laid out once per frame as a list of pre-wrapped lines, so the
//! line count is the scrollable height and card frames can be drawn around
//! wrapped text.

use std::mem;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use folio_types::{Education, Qualification, Role, StaticContent, sanitize_terminal_text};

use crate::markdown::render_inline;
use crate::theme::{Frame, Glyphs, Palette, styles};

/// Widest the page column grows.
pub const MAX_PAGE_WIDTH: u16 = 88;

/// A run of spans that wraps as a unit.
#[derive(Debug, Default)]
struct Word {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl Word {
    fn push(&mut self, text: &str, style: Style) {
        self.width += text.width();
        if let Some(last) = self.spans.last_mut()
            && last.style == style
        {
            last.content.to_mut().push_str(text);
            return;
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn first_style(&self) -> Option<Style> {
        self.spans.first().map(|span| span.style)
    }
}

/// Split styled text into words at whitespace. A word may span several
/// styles (`**UNRWA**’s`).
fn words(spans: &[Span<'_>]) -> Vec<Word> {
    let mut out = Vec::new();
    let mut word = Word::default();
    let mut run = String::new();
    for span in spans {
        for c in span.content.chars() {
            if c.is_whitespace() {
                if !run.is_empty() {
                    word.push(&run, span.style);
                    run.clear();
                }
                if !word.is_empty() {
                    out.push(mem::take(&mut word));
                }
            } else {
                run.push(c);
            }
        }
        if !run.is_empty() {
            word.push(&run, span.style);
            run.clear();
        }
    }
    if !word.is_empty() {
        out.push(word);
    }
    out
}

/// Break a word wider than the line into grapheme chunks.
fn split_long(word: Word, width: usize) -> Vec<Word> {
    if word.width <= width {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut piece = Word::default();
    for span in word.spans {
        for grapheme in span.content.graphemes(true) {
            if !piece.is_empty() && piece.width + grapheme.width() > width {
                pieces.push(mem::take(&mut piece));
            }
            piece.push(grapheme, span.style);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn push_span(line: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if let Some(last) = line.last_mut()
        && last.style == style
    {
        last.content.to_mut().push_str(text);
        return;
    }
    line.push(Span::styled(text.to_string(), style));
}

/// Greedy word wrap to `width` columns.
fn wrap(words: Vec<Word>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for piece in words.into_iter().flat_map(|word| split_long(word, width)) {
        if used > 0 && used + 1 + piece.width > width {
            lines.push(Line::from(mem::take(&mut current)));
            used = 0;
        }
        if used > 0 {
            // A gap inside a styled run (highlight, badge text) keeps the style.
            let previous = current.last().map(|span| span.style);
            let gap = if previous == piece.first_style() {
                previous.unwrap_or_default()
            } else {
                Style::default()
            };
            push_span(&mut current, " ", gap);
            used += 1;
        }
        used += piece.width;
        for span in piece.spans {
            push_span(&mut current, &span.content, span.style);
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn plain(text: &str, style: Style) -> Span<'static> {
    Span::styled(sanitize_terminal_text(text).into_owned(), style)
}

fn wrap_plain(text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    wrap(words(&[plain(text, style)]), width)
}

fn wrap_prose(
    text: &str,
    palette: &Palette,
    strong: Style,
    width: usize,
) -> Vec<Line<'static>> {
    wrap(
        words(&render_inline(text, styles::prose(palette), strong)),
        width,
    )
}

fn badges(labels: &[String], palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let style = styles::badge(palette);
    let tokens = labels
        .iter()
        .map(|label| {
            let mut word = Word::default();
            word.push(&format!(" {} ", sanitize_terminal_text(label.trim())), style);
            word
        })
        .collect();
    wrap(tokens, width)
}

/// `left · right` on one wrapped run.
fn byline(
    left: &str,
    right: &str,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let accent = styles::accent(palette);
    let spans = [
        plain(left, accent),
        Span::styled(format!(" {} ", glyphs.separator), accent),
        plain(right, accent),
    ];
    wrap(words(&spans), width)
}

fn centered(lines: Vec<Line<'static>>) -> impl Iterator<Item = Line<'static>> {
    lines.into_iter().map(Line::centered)
}

/// A framed block around already-wrapped body lines.
struct Card<'a> {
    frame: &'a Frame,
    border: Style,
    width: usize,
    label: Option<Span<'static>>,
}

impl<'a> Card<'a> {
    fn new(frame: &'a Frame, border: Style, width: usize) -> Self {
        Self {
            frame,
            border,
            width,
            label: None,
        }
    }

    /// Tag drawn into the top edge.
    fn label(mut self, label: Span<'static>) -> Self {
        self.label = Some(label);
        self
    }

    /// Columns available to body text.
    fn inner_width(&self) -> usize {
        self.width.saturating_sub(4).max(1)
    }

    fn render(self, body: Vec<Line<'static>>) -> Vec<Line<'static>> {
        // Too narrow to frame; the text still shows.
        if self.width < 5 {
            return body;
        }
        let inner = self.inner_width();
        let horizontal = self.frame.horizontal;
        let mut lines = Vec::with_capacity(body.len() + 4);

        let mut top = vec![Span::styled(self.frame.top_left, self.border)];
        let mut used = 1;
        if let Some(label) = self.label
            && label.width() + 4 <= self.width
        {
            top.push(Span::styled(horizontal, self.border));
            used += 1 + label.width();
            top.push(label);
        }
        top.push(Span::styled(
            horizontal.repeat(self.width.saturating_sub(used + 1)),
            self.border,
        ));
        top.push(Span::styled(self.frame.top_right, self.border));
        lines.push(Line::from(top));

        let edge = |line: Line<'static>| {
            let pad = inner.saturating_sub(line.width());
            let mut spans = vec![Span::styled(
                format!("{} ", self.frame.vertical),
                self.border,
            )];
            spans.extend(line.spans);
            spans.push(Span::raw(" ".repeat(pad)));
            spans.push(Span::styled(format!(" {}", self.frame.vertical), self.border));
            Line::from(spans)
        };
        lines.push(edge(Line::default()));
        lines.extend(body.into_iter().map(edge));
        lines.push(edge(Line::default()));

        lines.push(Line::from(vec![
            Span::styled(self.frame.bottom_left, self.border),
            Span::styled(horizontal.repeat(self.width.saturating_sub(2)), self.border),
            Span::styled(self.frame.bottom_right, self.border),
        ]));
        lines
    }
}

fn hero(
    content: &StaticContent,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let profile = &content.profile;
    let mut lines = vec![Line::default()];
    lines.extend(wrap_plain(&profile.greeting, styles::greeting(palette), width));
    lines.push(Line::default());
    lines.extend(wrap_prose(
        &profile.intro,
        palette,
        styles::highlight(palette),
        width,
    ));
    lines.push(Line::default());
    lines.extend(link_lines(content, palette, glyphs, width));
    lines
}

/// Outbound links; the primary one carries its key.
fn link_lines(
    content: &StaticContent,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, link) in content.profile.links.iter().enumerate() {
        let mut spans = vec![
            plain(&format!("{} {}", glyphs.link, link.label), styles::accent(palette)),
            Span::raw(" "),
            plain(&link.url, styles::muted(palette)),
        ];
        if index == 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled("[l]", styles::key_highlight(palette)));
        }
        lines.extend(wrap(words(&spans), width));
    }
    lines
}

fn about(
    content: &StaticContent,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let card = Card::new(&glyphs.frame, styles::card_border(palette, false), width);
    let inner = card.inner_width();
    let mut body = wrap_plain(&content.about.heading, styles::heading(palette), inner);
    for paragraph in &content.about.paragraphs {
        body.push(Line::default());
        body.extend(wrap_prose(paragraph, palette, styles::strong(palette), inner));
    }
    card.render(body)
}

fn role_card(
    role: &Role,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let mut card = Card::new(
        &glyphs.frame,
        styles::card_border(palette, role.featured),
        width,
    );
    if role.featured {
        card = card.label(Span::styled(
            format!(" {} CURRENT ROLE ", glyphs.star),
            styles::featured_badge(palette),
        ));
    }
    let inner = card.inner_width();

    let mut body = wrap_plain(&role.title, styles::heading(palette), inner);
    body.extend(byline(&role.organisation, &role.period, palette, glyphs, inner));
    body.push(Line::default());
    body.extend(wrap_prose(&role.summary, palette, styles::strong(palette), inner));
    if !role.badges.is_empty() {
        body.push(Line::default());
        body.extend(badges(&role.badges, palette, inner));
    }
    card.render(body)
}

fn qualification(
    qualification: &Qualification,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = wrap_plain(&qualification.degree, styles::heading(palette), width);
    lines.extend(byline(
        &qualification.institution,
        &qualification.period,
        palette,
        glyphs,
        width,
    ));
    lines.extend(wrap_plain(&qualification.result, styles::prose(palette), width));
    lines
}

fn education(
    education: &Education,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let card = Card::new(&glyphs.frame, styles::card_border(palette, false), width);
    let inner = card.inner_width();
    let mut body = wrap_plain(&education.heading, styles::heading(palette), inner);
    for entry in &education.qualifications {
        body.push(Line::default());
        body.extend(qualification(entry, palette, glyphs, inner));
    }
    if !education.badges.is_empty() {
        body.push(Line::default());
        body.extend(badges(&education.badges, palette, inner));
    }
    card.render(body)
}

fn footer(
    content: &StaticContent,
    palette: &Palette,
    glyphs: &Glyphs,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        glyphs.frame.horizontal.repeat(width),
        Style::default().fg(palette.border),
    ))];
    lines.push(Line::default());
    lines.extend(centered(wrap_plain(
        &content.footer.message,
        styles::prose(palette),
        width,
    )));
    lines.push(Line::default());
    lines.extend(centered(link_lines(content, palette, glyphs, width)));
    lines.push(Line::default());
    lines.extend(centered(wrap_plain(
        &content.footer.copyright,
        styles::muted(palette),
        width,
    )));
    lines.push(Line::default());
    lines
}

/// The whole page body, wrapped to `width` columns.
#[must_use]
pub fn page_lines(
    content: &StaticContent,
    width: u16,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = hero(content, palette, glyphs, width);

    lines.push(Line::default());
    lines.extend(about(content, palette, glyphs, width));

    lines.push(Line::default());
    lines.push(Line::default());
    lines.extend(centered(wrap_plain(
        &content.experience.heading,
        styles::heading(palette),
        width,
    )));
    for role in &content.experience.roles {
        lines.push(Line::default());
        lines.extend(role_card(role, palette, glyphs, width));
    }
    lines.push(Line::default());
    lines.extend(education(&content.education, palette, glyphs, width));

    lines.push(Line::default());
    lines.push(Line::default());
    lines.extend(footer(content, palette, glyphs, width));
    lines
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};

    use folio_types::UiOptions;

    use super::{Card, page_lines, words, wrap};
    use crate::theme::{Palette, glyphs};

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn content() -> folio_types::StaticContent {
        folio_engine::content::builtin().expect("built-in content")
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        let lines = wrap(words(&[Span::raw("one two three four")]), 9);
        let rows: Vec<_> = lines.iter().map(text).collect();
        assert_eq!(rows, ["one two", "three", "four"]);
    }

    #[test]
    fn wrap_splits_words_longer_than_the_line() {
        let lines = wrap(words(&[Span::raw("abcdefghij")]), 4);
        let rows: Vec<_> = lines.iter().map(text).collect();
        assert_eq!(rows, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_style_across_gaps_inside_a_run() {
        let mark = Style::default().bg(Color::Cyan);
        let spans = [
            Span::raw("about "),
            Span::styled("sustainable development", mark),
            Span::raw(" and"),
        ];
        let lines = wrap(words(&spans), 80);
        assert_eq!(lines.len(), 1);
        let styled: Vec<_> = lines[0]
            .spans
            .iter()
            .map(|span| (span.content.as_ref(), span.style))
            .collect();
        assert_eq!(
            styled,
            [
                ("about ", Style::default()),
                ("sustainable development", mark),
                (" and", Style::default()),
            ]
        );
    }

    #[test]
    fn card_rows_have_the_card_width() {
        let glyphs = glyphs(UiOptions::default());
        let card = Card::new(&glyphs.frame, Style::default(), 20);
        let body = wrap(words(&[Span::raw("a short body that wraps")]), card.inner_width());
        let lines = card.render(body);
        assert!(lines.iter().all(|line| line.width() == 20));
        assert!(text(&lines[0]).starts_with('╭'));
        assert!(text(&lines[lines.len() - 1]).ends_with('╯'));
    }

    #[test]
    fn card_label_sits_in_the_top_edge() {
        let glyphs = glyphs(UiOptions::default());
        let lines = Card::new(&glyphs.frame, Style::default(), 24)
            .label(Span::raw(" ★ CURRENT ROLE "))
            .render(Vec::new());
        assert_eq!(text(&lines[0]), "╭─ ★ CURRENT ROLE ─────╮");
    }

    #[test]
    fn no_line_exceeds_the_column() {
        let palette = Palette::standard();
        for width in [24_u16, 40, 60, 88] {
            for ascii_only in [false, true] {
                let glyphs = glyphs(UiOptions {
                    ascii_only,
                    high_contrast: false,
                });
                let lines = page_lines(&content(), width, &palette, &glyphs);
                for line in &lines {
                    assert!(
                        line.width() <= usize::from(width),
                        "{:?} wider than {width}",
                        text(line)
                    );
                }
            }
        }
    }

    #[test]
    fn every_section_is_present_in_order() {
        let glyphs = glyphs(UiOptions::default());
        let lines = page_lines(&content(), 80, &Palette::standard(), &glyphs);
        let page: Vec<_> = lines.iter().map(text).collect();
        let position = |needle: &str| {
            page.iter()
                .position(|row| row.contains(needle))
                .unwrap_or_else(|| panic!("{needle:?} missing"))
        };

        let order = [
            position("Hi, I'm Calum"),
            position("About Me"),
            position("Experience & Projects"),
            position("CURRENT ROLE"),
            position("Programme Officer - Rural Livelihoods"),
            position("Tearfund"),
            position("MPhil Development Studies"),
            position("Let's connect"),
            position("© 2025 Calum Steer."),
        ];
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{order:?}");
    }

    #[test]
    fn only_the_featured_role_is_labelled() {
        let glyphs = glyphs(UiOptions::default());
        let lines = page_lines(&content(), 80, &Palette::standard(), &glyphs);
        let labelled = lines
            .iter()
            .filter(|line| text(line).contains("CURRENT ROLE"))
            .count();
        assert_eq!(labelled, 1);
    }

    #[test]
    fn layout_is_deterministic() {
        let glyphs = glyphs(UiOptions::default());
        let palette = Palette::standard();
        assert_eq!(
            page_lines(&content(), 72, &palette, &glyphs),
            page_lines(&content(), 72, &palette, &glyphs)
        );
    }
}
