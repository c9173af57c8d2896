use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TMP_DIR: &str = "/tmp";
pub const DEFAULT_RELEASES_DIR: &str = "/data/web_static/releases";
pub const DEFAULT_CURRENT_LINK: &str = "/data/web_static/current";
pub const DEFAULT_NESTED_DIR: &str = "web_static";

/// A local archive selected for deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRef {
    path: PathBuf,
    file_name: String,
    release_name: String,
}

impl ArchiveRef {
    /// Returns `None` when the path has no UTF-8 file name or the derived
    /// release name is empty.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        let release_name = release_name(file_name);
        if release_name.is_empty() {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            release_name: release_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn release_name(&self) -> &str {
        &self.release_name
    }
}

/// Release name for an archive file name: everything before the first `.`.
///
/// `web_static_20170315003959.tgz` gives `web_static_20170315003959`, while
/// `my.app.v2.tgz` gives `my`.
pub fn release_name(file_name: &str) -> &str {
    file_name
        .split_once('.')
        .map_or(file_name, |(head, _)| head)
}

/// Remote paths a release is unpacked into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseLayout {
    pub tmp_dir: String,
    pub releases_dir: String,
    pub current_link: String,
    /// Top-level directory every archive is expected to contain
    pub nested_dir: String,
}

impl Default for ReleaseLayout {
    fn default() -> Self {
        Self {
            tmp_dir: DEFAULT_TMP_DIR.to_string(),
            releases_dir: DEFAULT_RELEASES_DIR.to_string(),
            current_link: DEFAULT_CURRENT_LINK.to_string(),
            nested_dir: DEFAULT_NESTED_DIR.to_string(),
        }
    }
}

impl ReleaseLayout {
    /// Rooted layout under `root`, used for local hosts and tests
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let join = |rel: &str| root.join(rel).display().to_string();
        Self {
            tmp_dir: join("tmp"),
            releases_dir: join("data/web_static/releases"),
            current_link: join("data/web_static/current"),
            nested_dir: DEFAULT_NESTED_DIR.to_string(),
        }
    }

    pub fn upload_path(&self, archive: &ArchiveRef) -> String {
        format!("{}/{}", self.tmp_dir.trim_end_matches('/'), archive.file_name())
    }

    /// Release directory with a trailing slash
    pub fn release_dir(&self, archive: &ArchiveRef) -> String {
        format!(
            "{}/{}/",
            self.releases_dir.trim_end_matches('/'),
            archive.release_name()
        )
    }

    pub fn nested_path(&self, archive: &ArchiveRef) -> String {
        format!("{}{}", self.release_dir(archive), self.nested_dir)
    }

    pub fn current_link(&self) -> &str {
        self.current_link.trim_end_matches('/')
    }
}
