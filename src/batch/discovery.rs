//! Catalog file discovery
//!
//! A directory holding `dashboard+layout.xml` (or `dashboard+layout`) is a
//! dashboard. Every other file is a report or prompt candidate unless it is
//! an attribute file (`.atr`) or a page file (`page+...`).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::models::PageRef;

pub const LAYOUT_FILE_NAMES: [&str; 2] = ["dashboard+layout.xml", "dashboard+layout"];

/// Files found under a catalog root, in file-name order per directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogLayout {
    pub dashboard_dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// Walk `root`; unreadable entries are skipped.
pub fn discover(root: &Path) -> CatalogLayout {
    let mut layout = CatalogLayout::default();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_dir() {
            if layout_file(path).is_some() {
                layout.dashboard_dirs.push(path.to_path_buf());
            }
        } else if entry.file_type().is_file() {
            layout.files.push(path.to_path_buf());
        }
    }
    layout
}

/// Layout document of a dashboard directory.
pub fn layout_file(dir: &Path) -> Option<PathBuf> {
    LAYOUT_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Page document for a page declared by the layout, with or without extension.
pub fn page_file(dir: &Path, page: &PageRef) -> Option<PathBuf> {
    let stem = page.file_stem();
    [dir.join(format!("{}.xml", stem)), dir.join(&stem)]
        .into_iter()
        .find(|path| path.is_file())
}

/// `.xml` files of a dashboard directory other than the layout, sorted by name.
pub fn standalone_pages(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            let name = file_name(path);
            name.to_lowercase().ends_with(".xml") && name != LAYOUT_FILE_NAMES[0]
        })
        .collect()
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without a trailing `.xml`.
pub fn file_stem(path: &Path) -> String {
    let name = file_name(path);
    match name.strip_suffix(".xml") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Attribute and page files are never documents on their own.
pub fn is_skipped(path: &Path) -> bool {
    let name = file_name(path);
    name.ends_with(".atr") || name.to_lowercase().contains("page+")
}

/// `prompt` in the file name or in the directory path below the root.
pub fn is_prompt_candidate(path: &Path, root: &Path) -> bool {
    if file_name(path).to_lowercase().contains("prompt") {
        return true;
    }
    path.parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .is_some_and(|rel| rel.to_string_lossy().to_lowercase().contains("prompt"))
}

/// Layout files are never reports.
pub fn is_report_candidate(path: &Path) -> bool {
    !file_name(path).to_lowercase().contains("dashboard+layout")
}
