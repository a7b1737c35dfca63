//! Page content loading.
//!
//! The built-in page ships inside the binary. A config entry can point at a
//! replacement document with the same shape.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use folio_types::{ContentError, StaticContent};

const BUILTIN_CONTENT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/content.toml"));

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read content at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse content{}: {source}", origin(path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    #[error("invalid content{}: {source}", origin(path.as_deref()))]
    Invalid {
        path: Option<PathBuf>,
        source: ContentError,
    },
}

fn origin(path: Option<&Path>) -> String {
    path.map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

fn parse(raw: &str, path: Option<&Path>) -> Result<StaticContent, ContentLoadError> {
    let content: StaticContent = toml::from_str(raw).map_err(|source| ContentLoadError::Parse {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    content
        .validate()
        .map_err(|source| ContentLoadError::Invalid {
            path: path.map(Path::to_path_buf),
            source,
        })?;
    Ok(content)
}

/// The page content compiled into the binary.
pub fn builtin() -> Result<StaticContent, ContentLoadError> {
    parse(BUILTIN_CONTENT, None)
}

/// Content from `path`, or the built-in page when `path` is `None`.
pub fn load(path: Option<&Path>) -> Result<StaticContent, ContentLoadError> {
    let Some(path) = path else {
        return builtin();
    };
    let raw = fs::read_to_string(path).map_err(|source| ContentLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = parse(&raw, Some(path))?;
    tracing::info!(path = %path.display(), "Loaded page content override");
    Ok(content)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_types::MetaKind;

    use super::{ContentLoadError, builtin, load};

    #[test]
    fn builtin_content_is_valid_and_complete() {
        let content = builtin().expect("built-in content");
        assert_eq!(content.profile.monogram, "CS");
        assert_eq!(content.experience.roles.len(), 5);
        assert_eq!(content.education.qualifications.len(), 2);
        assert_eq!(
            content.featured_role().map(|role| role.organisation.as_str()),
            Some("SEED Madagascar")
        );
        assert_eq!(
            content.profile.primary_link().map(|link| link.url.as_str()),
            Some("https://www.linkedin.com/in/calum-steer-8460b0149")
        );
    }

    #[test]
    fn builtin_metadata_is_literal() {
        let meta = builtin().expect("built-in content").meta;
        assert_eq!(
            meta.title,
            "Calum Steer - Development & Conservation Professional"
        );
        assert_eq!(meta.get("og:type"), Some("website"));
        assert_eq!(meta.get("og:url"), Some("https://calumsteer.com"));
        assert_eq!(meta.get("twitter:card"), Some("summary_large_image"));
        assert!(
            meta.tags
                .iter()
                .filter_map(|tag| tag.key())
                .any(|(kind, key)| kind == MetaKind::Name && key == "description")
        );
    }

    #[test]
    fn continuation_lines_join_with_single_spaces() {
        let content = builtin().expect("built-in content");
        assert!(content.profile.intro.starts_with("Programme Officer working"));
        assert!(!content.profile.intro.contains('\n'));
        assert!(!content.profile.intro.contains("  "));
    }

    #[test]
    fn missing_override_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(Some(&dir.path().join("content.toml"))).expect_err("missing");
        assert!(matches!(err, ContentLoadError::Read { .. }));
    }

    #[test]
    fn invalid_override_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("content.toml");
        let raw = include_str!("../assets/content.toml")
            .replace("monogram = \"CS\"", "monogram = \"\"");
        fs::write(&path, raw).expect("write");

        let err = load(Some(&path)).expect_err("empty monogram");
        assert!(matches!(err, ContentLoadError::Invalid { .. }));
        assert!(err.to_string().contains("content.toml"));
    }
}
