use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// File names of `*.json` wordbooks in `dir`, sorted case-insensitively.
pub fn list_wordbooks(dir: &Path) -> Result<Vec<String>, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::not_found(dir, None));
    }

    let read_dir = fs::read_dir(dir).map_err(|e| CoreError::not_found(dir, Some(e)))?;

    let mut names: Vec<String> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_wordbook_name(name))
        .collect();

    names.sort_by_key(|name| name.to_lowercase());
    tracing::debug!("Found {} wordbooks in {}", names.len(), dir.display());
    Ok(names)
}

fn is_wordbook_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == "json")
}

/// Path of wordbook `name` inside `dir`. Only bare file names are accepted.
pub fn wordbook_path(dir: &Path, name: &str) -> Result<PathBuf, CoreError> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CoreError::InvalidArgument(format!(
            "'{name}' is not a wordbook file name"
        )));
    }
    Ok(dir.join(name))
}

/// Keep `previous` if it is still listed, otherwise fall back to the first name.
pub fn pick_selection(names: &[String], previous: Option<&str>) -> Option<String> {
    previous
        .filter(|prev| names.iter().any(|name| name == prev))
        .map(str::to_string)
        .or_else(|| names.first().cloned())
}
