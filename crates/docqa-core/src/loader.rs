use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Document;

/// Read every file under `root` whose extension is in `extensions`
/// (case-insensitive). Documents are named by their path relative to `root`
/// and returned in sorted order.
pub fn load_documents(root: &Path, extensions: &[&str]) -> Result<Vec<Document>> {
    if !root.is_dir() {
        return Err(Error::Extraction(format!("{} is not a directory", root.display())));
    }
    let files = list_files(root, extensions);
    if files.is_empty() {
        info!(root = %root.display(), "no matching documents found");
        return Ok(Vec::new());
    }
    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let bytes = fs::read(&path).map_err(|e| Error::Extraction(format!("{}: {e}", path.display())))?;
        let name = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().to_string();
        debug!(%name, bytes = bytes.len(), "loaded document");
        docs.push(Document::new(name, bytes));
    }
    info!(root = %root.display(), count = docs.len(), "loaded documents");
    Ok(docs)
}

fn list_files(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
        })
        .collect();
    files.sort();
    files
}
