use crate::archive::{ArchiveError, Result};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path};
use tar::Archive;

/// Names of the top-level entries of a gzip-compressed tarball
pub fn top_level_entries(path: &Path) -> Result<BTreeSet<String>> {
    let unreadable = |e: std::io::Error| ArchiveError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let file = File::open(path)?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut names = BTreeSet::new();

    for entry in archive.entries().map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let entry_path = entry.path().map_err(unreadable)?;
        let first = entry_path.components().find_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        });
        if let Some(name) = first {
            names.insert(name);
        }
    }

    Ok(names)
}

/// Hex-encoded SHA-256 of a file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
