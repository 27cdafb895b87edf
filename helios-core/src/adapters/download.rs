//! Saves exported files to disk

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::Download;

/// Write `download` into `dir`, creating the directory if needed.
///
/// Returns the path of the written file. An existing file with the same
/// name is replaced.
pub fn save_download(download: &Download, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let name = sanitize_filename(&download.filename);
    let path = dir.join(name);
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = download.bytes.len(), "export saved");
    Ok(path)
}

/// Strip path separators and other characters that cannot appear in a file name
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == ' ');
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_download_writes_bytes() {
        let dir = tempdir().unwrap();
        let download = Download {
            filename: "faturas_2024-06-01.xlsx".to_string(),
            content_type: None,
            bytes: vec![1, 2, 3],
        };
        let path = save_download(&download, &dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "faturas_2024-06-01.xlsx");
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_filename("a:b.csv"), "a_b.csv");
        assert_eq!(sanitize_filename(".."), "download");
    }
}
