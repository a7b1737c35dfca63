//! CV download action.
//!
//! The terminal counterpart of a transient `<a download>` element: the asset
//! is copied into the download directory through a temp file that exists
//! only for the duration of one attempt. The temp file is removed whether
//! the attempt succeeds or fails, and an existing download is never
//! overwritten (`name (1).pdf`, `name (2).pdf`, ...).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Where the asset is served from when nothing is configured.
pub const DEFAULT_CV_PATH: &str = "public/CS-CV.pdf";
/// File name offered to the user.
pub const DEFAULT_CV_FILE_NAME: &str = "Calum_Steer_CV.pdf";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("CV asset {} is unavailable: {source}", path.display())]
    Asset { path: PathBuf, source: io::Error },
    #[error("could not save into {}: {source}", dir.display())]
    Save { dir: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvDownload {
    asset: PathBuf,
    file_name: String,
    target_dir: PathBuf,
}

impl CvDownload {
    #[must_use]
    pub fn new(
        asset: impl Into<PathBuf>,
        file_name: impl Into<String>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            asset: asset.into(),
            file_name: file_name.into(),
            target_dir: target_dir.into(),
        }
    }

    /// The fixed asset, the user's download directory (falling back to the
    /// working directory), and the default display name.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_CV_PATH,
            DEFAULT_CV_FILE_NAME,
            default_download_dir(),
        )
    }

    #[must_use]
    pub fn asset(&self) -> &Path {
        &self.asset
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Run one download attempt. Each call is independent.
    pub fn trigger(&self) -> Result<PathBuf, DownloadError> {
        let bytes = fs::read(&self.asset).map_err(|source| DownloadError::Asset {
            path: self.asset.clone(),
            source,
        })?;

        let saved = folio_utils::persist_new_unique(&self.target_dir, &self.file_name, &bytes)
            .map_err(|source| DownloadError::Save {
                dir: self.target_dir.clone(),
                source,
            })?;

        tracing::info!(
            asset = %self.asset.display(),
            saved = %saved.display(),
            bytes = bytes.len(),
            "CV downloaded"
        );
        Ok(saved)
    }
}

#[must_use]
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{CvDownload, DownloadError};

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn fixture() -> (tempfile::TempDir, CvDownload) {
        let root = tempfile::tempdir().expect("tempdir");
        let asset = root.path().join("CS-CV.pdf");
        fs::write(&asset, b"%PDF-1.7 fixture").expect("write asset");
        let downloads = root.path().join("Downloads");
        fs::create_dir(&downloads).expect("mkdir");
        let download = CvDownload::new(asset, "Calum_Steer_CV.pdf", downloads);
        (root, download)
    }

    #[test]
    fn repeated_triggers_are_independent_and_leave_no_temp_files() {
        let (_root, download) = fixture();

        for _ in 0..3 {
            download.trigger().expect("download");
        }

        assert_eq!(
            listing(download.target_dir()),
            [
                "Calum_Steer_CV (1).pdf",
                "Calum_Steer_CV (2).pdf",
                "Calum_Steer_CV.pdf",
            ]
        );
        for name in listing(download.target_dir()) {
            let bytes = fs::read(download.target_dir().join(name)).expect("read");
            assert_eq!(bytes, b"%PDF-1.7 fixture");
        }
    }

    #[test]
    fn missing_asset_leaves_target_untouched() {
        let (root, _) = fixture();
        let download = CvDownload::new(
            root.path().join("missing.pdf"),
            "Calum_Steer_CV.pdf",
            root.path().join("Downloads"),
        );

        let err = download.trigger().expect_err("asset is missing");
        assert!(matches!(err, DownloadError::Asset { .. }));
        assert!(listing(download.target_dir()).is_empty());
    }

    #[test]
    fn missing_target_dir_reports_save_error() {
        let (root, download) = fixture();
        let download = CvDownload::new(
            download.asset(),
            download.file_name(),
            root.path().join("gone"),
        );

        let err = download.trigger().expect_err("target missing");
        assert!(matches!(err, DownloadError::Save { .. }));
        assert_eq!(listing(root.path()), ["CS-CV.pdf", "Downloads"]);
    }
}
