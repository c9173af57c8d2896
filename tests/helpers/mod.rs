//! Shared fixtures for deployment tests
#![allow(dead_code)]

pub mod recording;

pub use recording::*;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a placeholder archive; the recording transport never reads it
pub fn fake_archive(dir: &TempDir, file_name: &str) -> PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, b"not really a tarball").unwrap();
    path
}

/// Builds `<root>/web_static` with `index.html` and `styles/main.css`
pub fn create_site(root: &Path) -> PathBuf {
    let site = root.join("web_static");
    fs::create_dir_all(site.join("styles")).unwrap();
    fs::write(site.join("index.html"), "<h1>Holberton</h1>\n").unwrap();
    fs::write(site.join("styles/main.css"), "h1 { color: red; }\n").unwrap();
    site
}
