//! Reads plain-text documents from a directory

use crate::error::{RagError, Result};
use crate::models::Document;
use docqa_config::DocumentsConfig;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A file that could not be turned into a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLoadError {
    pub path: PathBuf,
    pub message: String,
}

impl From<DocumentLoadError> for RagError {
    fn from(err: DocumentLoadError) -> Self {
        RagError::DocumentLoad {
            path: err.path,
            message: err.message,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedDocuments {
    /// Sorted by id
    pub documents: Vec<Document>,
    pub failures: Vec<DocumentLoadError>,
}

pub fn load_documents(dir: &Path, config: &DocumentsConfig) -> Result<LoadedDocuments> {
    if !dir.is_dir() {
        return Err(RagError::DocumentLoad {
            path: dir.to_path_buf(),
            message: "directory not found".to_string(),
        });
    }

    // Every matching file is a document: no hidden or gitignore filtering.
    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false)
        .max_depth(if config.recursive { None } else { Some(1) });

    let mut loaded = LoadedDocuments::default();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                error!("error walking {}: {}", dir.display(), err);
                loaded.failures.push(DocumentLoadError {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some(config.extension.as_str()) {
            continue;
        }

        let id = document_id(dir, path);
        match read_text(path) {
            Ok(text) if text.trim().is_empty() => {
                debug!("skipping empty document {}", id);
            }
            Ok(text) => {
                debug!("loaded {} ({} chars)", id, text.chars().count());
                loaded.documents.push(Document::new(id, text));
            }
            Err(message) => {
                error!("failed to load {}: {}", path.display(), message);
                loaded.failures.push(DocumentLoadError {
                    path: path.to_path_buf(),
                    message,
                });
            }
        }
    }

    loaded.documents.sort_by(|a, b| a.id.cmp(&b.id));
    info!(
        "loaded {} documents from {} ({} failed)",
        loaded.documents.len(),
        dir.display(),
        loaded.failures.len()
    );
    Ok(loaded)
}

fn read_text(path: &Path) -> std::result::Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|_| "file is not valid UTF-8".to_string())
}

/// Path relative to `root` with `/` separators
fn document_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
