use crate::archive::{ArchiveError, Result};
use chrono::NaiveDateTime;
use flate2::{write::GzEncoder, Compression};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tar::Builder;
use tracing::info;

/// Top-level directory name inside every packed archive
pub const ARCHIVE_ROOT: &str = "web_static";
pub const ARCHIVE_PREFIX: &str = "web_static_";

/// `web_static_<YYYYmmddHHMMSS>.tgz`
pub fn archive_file_name(timestamp: &NaiveDateTime) -> String {
    format!("{ARCHIVE_PREFIX}{}.tgz", timestamp.format("%Y%m%d%H%M%S"))
}

/// Packs `source_dir` into `output_dir/web_static_<timestamp>.tgz`, rooted
/// at `root/` regardless of the source directory's own name. `root` must match
/// the `nested_dir` of the layout the archive is deployed with; the default
/// is [`ARCHIVE_ROOT`].
pub fn pack_directory(
    source_dir: &Path,
    output_dir: &Path,
    root: &str,
    timestamp: &NaiveDateTime,
) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(ArchiveError::SourceNotFound {
            path: source_dir.display().to_string(),
        });
    }

    fs::create_dir_all(output_dir)?;
    let archive_path = output_dir.join(archive_file_name(timestamp));
    info!(
        "Packing {} -> {}",
        source_dir.display(),
        archive_path.display()
    );

    let file = File::create(&archive_path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = Builder::new(encoder);
    builder.append_dir_all(root, source_dir)?;

    let encoder = builder.into_inner()?;
    let mut writer = encoder.finish()?;
    writer.flush()?;

    Ok(archive_path)
}
