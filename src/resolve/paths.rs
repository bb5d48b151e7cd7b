//! Catalog path conventions
//!
//! File names in a catalog export encode spaces as `+` and may percent-encode
//! other characters (`%2e` for `.`). Dashboard references use decoded catalog
//! paths such as `/shared/Sales/Revenue by Region`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Component, Path};

/// Percent-decode, keeping the input when it does not decode to UTF-8.
pub fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| value.to_string())
}

fn strip_xml_extension(path: &str) -> &str {
    path.strip_suffix(".xml").unwrap_or(path)
}

/// Slash-separated components of `path` relative to `root`.
fn relative_components(path: &Path, root: &Path) -> Vec<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Relative path with `/` separators, `root` when `path` is the root itself.
pub fn relative_name(path: &Path, root: &Path) -> String {
    let parts = relative_components(path, root);
    if parts.is_empty() {
        "root".to_string()
    } else {
        parts.join("/")
    }
}

/// Catalog path of a report or prompt file (`shared/a+b%2ec.xml` -> `/shared/a b.c`).
pub fn document_catalog_path(file: &Path, root: &Path) -> String {
    let joined = format!("/{}", relative_components(file, root).join("/"));
    let decoded = percent_decode(&joined.replace('+', " "));
    strip_xml_extension(&decoded).to_string()
}

/// Catalog path of a dashboard page file, starting at the `shared` folder when there is one.
pub fn worksheet_catalog_path(file: &Path, root: &Path) -> String {
    let parts = relative_components(file, root);
    let start = parts
        .iter()
        .position(|p| p.eq_ignore_ascii_case("shared"))
        .unwrap_or(0);
    let joined = format!("/{}", parts[start..].join("/")).replace('+', " ");
    strip_xml_extension(&joined).to_string()
}

/// Display name of a dashboard: its last folder, decoded.
pub fn dashboard_display_name(dashboard_name: &str) -> String {
    let spaced = dashboard_name.replace('+', " ");
    percent_decode(spaced.rsplit('/').next().unwrap_or_default())
}

/// Catalog path of a dashboard folder name (`shared/hr/_portal/hr+dashboard` -> `/shared/hr/_portal/hr dashboard`).
pub fn dashboard_catalog_path(dashboard_name: &str) -> String {
    if dashboard_name.is_empty() {
        return String::new();
    }
    let spaced = dashboard_name.replace('+', " ");
    if spaced.starts_with('/') {
        spaced
    } else {
        format!("/{}", spaced)
    }
}

/// Last segment of a catalog path.
pub fn basename(path: &str) -> &str {
    path.trim_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Parent folder of a catalog path, without surrounding slashes.
pub fn parent_folder(path: &str) -> &str {
    let trimmed = path.trim_matches('/');
    trimmed.rsplit_once('/').map(|(parent, _)| parent).unwrap_or_default()
}

/// Case-insensitive lookup of documents by catalog path with a basename fallback
///
/// The first document registered under a basename wins the fallback.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_path: HashMap<String, usize>,
    by_basename: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::default();
        for (position, path) in paths.into_iter().enumerate() {
            index.by_path.entry(path.to_lowercase()).or_insert(position);
            let base = basename(path).to_lowercase();
            if !base.is_empty() {
                index.by_basename.entry(base).or_insert(position);
            }
        }
        index
    }

    /// Position of the document a reference points at.
    pub fn resolve(&self, reference: &str) -> Option<usize> {
        let decoded = percent_decode(reference).to_lowercase();
        if let Some(found) = self.by_path.get(&decoded) {
            return Some(*found);
        }
        let spaced = decoded.replace('+', " ");
        if let Some(found) = self.by_path.get(&spaced) {
            return Some(*found);
        }
        self.by_basename.get(basename(&spaced)).copied()
    }
}
