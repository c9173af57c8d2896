//! Local archive handling: packing `web_static` snapshots and inspecting
//! archives before they are shipped.

pub mod inspect;
pub mod pack;

pub use inspect::{sha256_file, top_level_entries};
pub use pack::{archive_file_name, pack_directory, ARCHIVE_PREFIX, ARCHIVE_ROOT};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: String },

    #[error("Failed to read archive {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
