//! Inline markdown to ratatui spans.
//!
//! Page prose supports `**strong**` and `*emphasis*` only; block structure
//! is flattened into a single run of spans that the page layout wraps.
//! Parsed runs are cached since the same prose is laid out every frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use folio_types::sanitize_terminal_text;

/// Maximum number of cached renders before eviction.
const CACHE_MAX_ENTRIES: usize = 64;

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    content_hash: u64,
    style_hash: u64,
}

impl CacheKey {
    fn new(content: &str, base: Style, strong: Style) -> Self {
        let mut content_hasher = DefaultHasher::new();
        content.hash(&mut content_hasher);

        let mut style_hasher = DefaultHasher::new();
        for style in [base, strong] {
            style.fg.hash(&mut style_hasher);
            style.bg.hash(&mut style_hasher);
            style.add_modifier.hash(&mut style_hasher);
            style.sub_modifier.hash(&mut style_hasher);
        }

        Self {
            content_hash: content_hasher.finish(),
            style_hash: style_hasher.finish(),
        }
    }
}

thread_local! {
    static RENDER_CACHE: RefCell<HashMap<CacheKey, Vec<Span<'static>>>> = RefCell::new(HashMap::new());
}

/// Clear the render cache. Call when switching themes.
pub fn clear_render_cache() {
    RENDER_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Render inline markdown to a flat run of spans.
///
/// Text outside markup gets `base`; `**strong**` gets `strong`; emphasis
/// adds italics to whichever style is active. Line breaks collapse to a
/// single space.
pub fn render_inline(content: &str, base: Style, strong: Style) -> Vec<Span<'static>> {
    let key = CacheKey::new(content, base, strong);

    if let Some(spans) = RENDER_CACHE.with(|cache| cache.borrow().get(&key).cloned()) {
        return spans;
    }

    // Scrub before parsing: an escape sequence may straddle text events.
    let spans = InlineRenderer::new(base, strong).render(&sanitize_terminal_text(content));

    RENDER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.len() >= CACHE_MAX_ENTRIES {
            cache.clear();
        }
        cache.insert(key, spans.clone());
    });

    spans
}

struct InlineRenderer {
    base: Style,
    strong: Style,
    // Counters, not booleans: `***both***` nests strong inside emphasis.
    strong_count: usize,
    emphasis_count: usize,
    paragraphs: usize,
    spans: Vec<Span<'static>>,
}

impl InlineRenderer {
    fn new(base: Style, strong: Style) -> Self {
        Self {
            base,
            strong,
            strong_count: 0,
            emphasis_count: 0,
            paragraphs: 0,
            spans: Vec::new(),
        }
    }

    fn render(mut self, content: &str) -> Vec<Span<'static>> {
        for event in Parser::new(content) {
            match event {
                Event::Start(Tag::Strong) => self.strong_count += 1,
                Event::End(TagEnd::Strong) => {
                    self.strong_count = self.strong_count.saturating_sub(1);
                }
                Event::Start(Tag::Emphasis) => self.emphasis_count += 1,
                Event::End(TagEnd::Emphasis) => {
                    self.emphasis_count = self.emphasis_count.saturating_sub(1);
                }
                Event::Start(Tag::Paragraph) => {
                    if self.paragraphs > 0 {
                        self.push(" ");
                    }
                    self.paragraphs += 1;
                }
                Event::Text(text) | Event::Code(text) => self.push(&text),
                // Prose is literal; anything that parses as HTML is shown as typed.
                Event::Html(text) | Event::InlineHtml(text) => self.push(&text),
                Event::SoftBreak | Event::HardBreak => self.push(" "),
                _ => {}
            }
        }
        self.spans
    }

    fn current_style(&self) -> Style {
        let style = if self.strong_count > 0 {
            self.strong
        } else {
            self.base
        };
        if self.emphasis_count > 0 {
            style.add_modifier(Modifier::ITALIC)
        } else {
            style
        }
    }

    fn push(&mut self, text: &str) {
        let style = self.current_style();
        // Merge with the previous span when the style carries over.
        if let Some(last) = self.spans.last_mut()
            && last.style == style
        {
            last.content.to_mut().push_str(text);
            return;
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }
}
