//! Failure artifacts.
//!
//! Screenshots land in one directory, keyed by scenario name and a local
//! timestamp: `<dir>/<scenario>-<YYYYmmdd-HHMMSS-mmm>.png`.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::result::ProbeResult;

/// Timestamp format used in artifact file names
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S-%3f";

/// Directory of failure screenshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `dir`; created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a screenshot for `scenario` taken now would be written to
    #[must_use]
    pub fn screenshot_path(&self, scenario: &str) -> PathBuf {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        self.dir
            .join(format!("{}-{stamp}.png", sanitize(scenario)))
    }

    /// Write PNG bytes for `scenario`
    pub fn save_screenshot(&self, scenario: &str, png: &[u8]) -> ProbeResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.screenshot_path(scenario);
        std::fs::write(&path, png)?;
        tracing::info!(path = %path.display(), "saved failure screenshot");
        Ok(path)
    }
}

/// Keep names filesystem-safe
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
