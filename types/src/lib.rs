//! Core domain types for Folio.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod content;
mod meta;
mod sanitize;
mod scroll;
mod ui;

pub use content::{
    About, Education, Experience, Footer, Link, Profile, Qualification, Role, StaticContent,
};
pub use meta::{MetaKind, MetaTag, PageMeta};
pub use sanitize::sanitize_terminal_text;
pub use scroll::{SCROLL_THRESHOLD, ScrollOffset, ScrollPhase, is_scrolled};
pub use ui::UiOptions;

use thiserror::Error;

/// Content that violates an invariant the renderer relies on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("experience role #{index} has an empty `{field}`")]
    EmptyRoleField { index: usize, field: &'static str },
    #[error("qualification #{index} has an empty `{field}`")]
    EmptyQualificationField { index: usize, field: &'static str },
    #[error("meta tag #{index} must set exactly one of `name` or `property`")]
    AmbiguousMetaTag { index: usize },
    #[error("link `{label}` must be an http(s) URL")]
    InvalidLink { label: String },
}
