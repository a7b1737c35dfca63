//! Core engine for Folio: page state and user actions.
//!
//! This crate contains the App state without TUI dependencies. The TUI reads
//! the scroll phase and content from here, and forwards scroll and action
//! input back in.
//!
//! ```text
//! input -> App::scroll_by -> Viewport -> ScrollObserver -> phase -> draw
//! ```

use std::time::{Duration, Instant};

use tracing::{info, warn};

pub use folio_types::{
    SCROLL_THRESHOLD, ScrollOffset, ScrollPhase, StaticContent, UiOptions, is_scrolled,
};

mod config;
pub mod content;
mod download;
pub mod links;
mod observer;
mod session;
mod viewport;

pub use config::{
    AppConfig, ConfigError, ContentConfig, CvConfig, FolioConfig, SessionConfig, config_path,
    expand_env_vars, folio_home,
};
pub use content::ContentLoadError;
pub use download::{CvDownload, DEFAULT_CV_FILE_NAME, DEFAULT_CV_PATH, DownloadError};
pub use links::Opener;
pub use observer::ScrollObserver;
pub use session::{SessionError, SessionState, SessionStore};
pub use viewport::{Subscription, Viewport};

/// How long a status notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Where the page is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// A live terminal session: the scroll observer is active.
    Interactive,
    /// A one-shot render with no terminal. Nothing is observed and the
    /// header is always in its top-of-page state.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient status-line message reporting the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    shown_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }
}

/// Everything `App::new` needs besides the content.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub context: RenderContext,
    pub ui_options: UiOptions,
    pub download: CvDownload,
    /// Where the scroll offset is persisted; `None` disables restoration.
    pub session: Option<SessionStore>,
    /// Offset the view opens at.
    pub initial_offset: ScrollOffset,
}

impl AppSettings {
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        Self {
            context,
            ui_options: UiOptions::default(),
            download: CvDownload::with_defaults(),
            session: None,
            initial_offset: ScrollOffset::TOP,
        }
    }
}

#[derive(Debug)]
pub struct App {
    content: StaticContent,
    context: RenderContext,
    ui_options: UiOptions,
    viewport: Viewport,
    /// Present exactly while the view is active.
    observer: Option<ScrollObserver>,
    download: CvDownload,
    opener: Opener,
    session: Option<SessionStore>,
    notice: Option<Notice>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(content: StaticContent, settings: AppSettings) -> Self {
        let viewport = Viewport::new(settings.initial_offset);
        let observer = match settings.context {
            RenderContext::Interactive => Some(ScrollObserver::activate(&viewport)),
            RenderContext::Static => None,
        };
        Self {
            content,
            context: settings.context,
            ui_options: settings.ui_options,
            viewport,
            observer,
            download: settings.download,
            opener: links::open_external,
            session: settings.session,
            notice: None,
            should_quit: false,
        }
    }

    /// Build the app from config: content, CV target, UI options and, for
    /// interactive sessions, the restored scroll offset.
    pub fn from_config(
        config: Option<&FolioConfig>,
        context: RenderContext,
    ) -> Result<Self, ContentLoadError> {
        let content = content::load(FolioConfig::content_path(config).as_deref())?;

        let mut settings = AppSettings::new(context);
        settings.ui_options = FolioConfig::ui_options(config);
        settings.download = FolioConfig::cv_download(config);

        if context == RenderContext::Interactive && FolioConfig::restore_scroll(config) {
            if let Some(store) = folio_home().map(|home| SessionStore::in_dir(&home)) {
                if let Some(state) = store.load() {
                    settings.initial_offset = state.scroll_offset;
                }
                settings.session = Some(store);
            }
        }

        info!(
            context = ?context,
            offset = settings.initial_offset.rows(),
            "Page view created"
        );
        Ok(Self::new(content, settings))
    }

    /// Replace the link launcher (tests, sandboxes).
    #[must_use]
    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    pub fn content(&self) -> &StaticContent {
        &self.content
    }

    pub fn context(&self) -> RenderContext {
        self.context
    }

    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.viewport.offset()
    }

    /// The header phase. `AtTop` whenever no observer is active.
    pub fn scroll_phase(&self) -> ScrollPhase {
        self.observer
            .as_ref()
            .map(ScrollObserver::phase)
            .unwrap_or_default()
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll_phase().is_scrolled()
    }

    pub fn is_active(&self) -> bool {
        self.observer.is_some()
    }

    /// Tear the view down: the observer detaches from the viewport.
    pub fn deactivate(&mut self) {
        if self.observer.take().is_some() {
            tracing::debug!("Scroll observer deactivated");
        }
    }

    /// Record the scrollable range computed by the last layout.
    pub fn set_scroll_bounds(&mut self, max: ScrollOffset, page_rows: u16) {
        self.viewport.set_bounds(max, page_rows);
    }

    pub fn scroll_by(&mut self, rows: i32) {
        self.viewport.scroll_by(rows);
    }

    /// Scroll by whole pages of the visible body; negative scrolls up.
    pub fn scroll_pages(&mut self, pages: i32) {
        let page = i32::from(self.viewport.page_rows());
        self.viewport.scroll_by(pages.saturating_mul(page));
    }

    pub fn scroll_to_top(&mut self) {
        self.viewport.scroll_to(ScrollOffset::TOP);
    }

    pub fn scroll_to_bottom(&mut self) {
        let max = self.viewport.max();
        self.viewport.scroll_to(max);
    }

    /// The download control. Fire-and-forget: the outcome only reaches the
    /// log and the status line.
    pub fn download_cv(&mut self) {
        match self.download.trigger() {
            Ok(saved) => {
                self.notice = Some(Notice::new(
                    NoticeKind::Info,
                    format!("Saved CV to {}", saved.display()),
                ));
            }
            Err(e) => {
                warn!("CV download failed: {e}");
                self.notice = Some(Notice::new(NoticeKind::Error, format!("Download failed: {e}")));
            }
        }
    }

    /// Open the profile's primary link in the system browser.
    pub fn open_primary_link(&mut self) {
        let Some(link) = self.content.profile.primary_link() else {
            return;
        };
        let notice = match (self.opener)(&link.url) {
            Ok(()) => {
                info!(url = %link.url, "Opened external link");
                Notice::new(NoticeKind::Info, format!("Opening {} in your browser", link.label))
            }
            Err(e) => {
                warn!(url = %link.url, "Failed to open external link: {e}");
                Notice::new(
                    NoticeKind::Error,
                    format!("Could not open {}: {}", link.url, e),
                )
            }
        };
        self.notice = Some(notice);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Advance time-based state (notice expiry).
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|notice| notice.expired(now)) {
            self.notice = None;
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Persist the scroll offset for the next launch (no-op without a store).
    pub fn save_session(&self) -> Result<(), SessionError> {
        match &self.session {
            Some(store) => store.save(SessionState::new(self.scroll_offset())),
            None => Ok(()),
        }
    }
}
