use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use folio_types::UiOptions;

use crate::download::{CvDownload, DEFAULT_CV_FILE_NAME, DEFAULT_CV_PATH, default_download_dir};

// Default value function for serde (bool::default() is false, so only true needs a fn)
pub(crate) const fn default_true() -> bool {
    true
}

/// `~/.folio/config.toml`
///
/// ```toml
/// [app]
/// high_contrast = false
/// ascii_only = false
/// static_render = false
///
/// [cv]
/// path = "public/CS-CV.pdf"
/// file_name = "Calum_Steer_CV.pdf"
/// download_dir = "~/Downloads"
///
/// [content]
/// path = "~/portfolio/content.toml"
///
/// [session]
/// restore_scroll = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    pub app: Option<AppConfig>,
    pub cv: Option<CvConfig>,
    pub content: Option<ContentConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Print the page once instead of opening an interactive session.
    #[serde(default)]
    pub static_render: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CvConfig {
    /// Asset to download. Default: `public/CS-CV.pdf`.
    pub path: Option<String>,
    /// Name the saved file is given. Default: `Calum_Steer_CV.pdf`.
    pub file_name: Option<String>,
    /// Directory downloads are saved into. Default: the platform download dir.
    pub download_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Replace the built-in page content with this TOML document.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Reopen at the scroll position of the last session.
    #[serde(default = "default_true")]
    pub restore_scroll: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restore_scroll: true,
        }
    }
}

/// Expand `${VAR}` references and a leading `~`.
///
/// Unset variables expand to the empty string; an unclosed `${` is kept
/// literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    if let Some(tail) = rest.strip_prefix('~')
        && (tail.is_empty() || tail.starts_with('/') || tail.starts_with('\\'))
        && let Some(home) = dirs::home_dir()
    {
        out.push_str(&home.to_string_lossy());
        rest = tail;
    }

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    out.push_str(&env::var(name).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|raw| is_truthy(&raw))
}

impl FolioConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Config flags overridden by `FOLIO_HIGH_CONTRAST`.
    #[must_use]
    pub fn ui_options(config: Option<&Self>) -> UiOptions {
        let app = config.and_then(|cfg| cfg.app.as_ref());
        UiOptions {
            ascii_only: app.is_some_and(|app| app.ascii_only),
            high_contrast: app.is_some_and(|app| app.high_contrast)
                || env_flag("FOLIO_HIGH_CONTRAST"),
        }
    }

    /// `static_render` from config or `FOLIO_STATIC`.
    #[must_use]
    pub fn static_render(config: Option<&Self>) -> bool {
        config
            .and_then(|cfg| cfg.app.as_ref())
            .is_some_and(|app| app.static_render)
            || env_flag("FOLIO_STATIC")
    }

    #[must_use]
    pub fn restore_scroll(config: Option<&Self>) -> bool {
        config
            .and_then(|cfg| cfg.session.as_ref())
            .is_none_or(|session| session.restore_scroll)
    }

    #[must_use]
    pub fn content_path(config: Option<&Self>) -> Option<PathBuf> {
        config
            .and_then(|cfg| cfg.content.as_ref())
            .and_then(|content| content.path.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
    }

    #[must_use]
    pub fn cv_download(config: Option<&Self>) -> CvDownload {
        let cv = config.and_then(|cfg| cfg.cv.as_ref());
        let asset = cv
            .and_then(|cv| cv.path.as_deref())
            .map_or_else(|| PathBuf::from(DEFAULT_CV_PATH), |raw| {
                PathBuf::from(expand_env_vars(raw))
            });
        let file_name = cv
            .and_then(|cv| cv.file_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_CV_FILE_NAME);
        let target_dir = cv
            .and_then(|cv| cv.download_dir.as_deref())
            .map_or_else(default_download_dir, |raw| {
                PathBuf::from(expand_env_vars(raw))
            });
        CvDownload::new(asset, file_name, target_dir)
    }
}

/// `~/.folio`, home of the config, session and log files.
#[must_use]
pub fn folio_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".folio"))
}

pub fn config_path() -> Option<PathBuf> {
    folio_home().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ConfigError, FolioConfig, expand_env_vars};

    fn parse(raw: &str) -> FolioConfig {
        toml::from_str(raw).expect("config parses")
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_replaces_and_blanks() {
        unsafe {
            std::env::set_var("FOLIO_TEST_DIR", "docs");
            std::env::remove_var("FOLIO_TEST_UNSET");
        }
        assert_eq!(
            expand_env_vars("/srv/${FOLIO_TEST_DIR}/${FOLIO_TEST_UNSET}cv.pdf"),
            "/srv/docs/cv.pdf"
        );
        unsafe {
            std::env::remove_var("FOLIO_TEST_DIR");
        }
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("test ${UNCLOSED"), "test ${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_tilde_only_at_start() {
        let home = dirs::home_dir().expect("home dir");
        assert_eq!(
            PathBuf::from(expand_env_vars("~/Downloads")),
            PathBuf::from(format!("{}/Downloads", home.to_string_lossy()))
        );
        assert_eq!(expand_env_vars("a~/b"), "a~/b");
        assert_eq!(expand_env_vars("~user/b"), "~user/b");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("");
        let download = FolioConfig::cv_download(Some(&config));
        assert_eq!(download.asset(), PathBuf::from("public/CS-CV.pdf"));
        assert_eq!(download.file_name(), "Calum_Steer_CV.pdf");
        assert!(FolioConfig::restore_scroll(Some(&config)));
        assert!(FolioConfig::restore_scroll(None));
        assert_eq!(FolioConfig::content_path(Some(&config)), None);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [app]
            ascii_only = true

            [cv]
            path = "/srv/cv.pdf"
            file_name = "cv.pdf"
            download_dir = "/tmp/out"

            [content]
            path = "/srv/content.toml"

            [session]
            restore_scroll = false
            "#,
        );
        let download = FolioConfig::cv_download(Some(&config));
        assert_eq!(download.asset(), PathBuf::from("/srv/cv.pdf"));
        assert_eq!(download.file_name(), "cv.pdf");
        assert_eq!(download.target_dir(), PathBuf::from("/tmp/out"));
        assert!(!FolioConfig::restore_scroll(Some(&config)));
        assert!(FolioConfig::ui_options(Some(&config)).ascii_only);
        assert_eq!(
            FolioConfig::content_path(Some(&config)),
            Some(PathBuf::from("/srv/content.toml"))
        );
    }

    #[test]
    fn session_section_defaults_restore_on() {
        let config = parse("[session]\n");
        assert!(FolioConfig::restore_scroll(Some(&config)));
    }

    #[test]
    fn parse_error_carries_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[app\n").expect("write");

        let err = FolioConfig::load_from(&path).expect_err("invalid toml");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FolioConfig>("[app]\ntui = \"inline\"\n").is_err());
    }
}
