//! Catalog loading from per-category JSON documents.

use super::record::{parse_part, PartError};
use super::types::{Category, Part};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load the catalog as a whole.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no component files could be loaded from {}", .data_dir.display())]
    NoCategories { data_dir: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// In-memory part collections keyed by category.
///
/// Immutable after construction; shared between requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: BTreeMap<Category, Vec<Part>>,
}

impl Catalog {
    /// Builds a catalog from already-parsed parts.
    ///
    /// Parts are grouped by their own category; insertion order within a
    /// category is preserved.
    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        let mut grouped: BTreeMap<Category, Vec<Part>> = BTreeMap::new();
        for part in parts {
            grouped.entry(part.category()).or_default().push(part);
        }
        Self { parts: grouped }
    }

    /// Parts of one category (empty if the category was not loaded).
    pub fn parts(&self, category: Category) -> &[Part] {
        self.parts.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories that were loaded, in canonical order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.parts.keys().copied()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.parts.contains_key(&category)
    }

    /// Total number of parts across all categories.
    pub fn len(&self) -> usize {
        self.parts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads category documents from a data directory.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    data_dir: PathBuf,
}

impl CatalogLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads every category that has a readable document.
    ///
    /// Missing or unreadable category documents are logged and skipped.
    /// Fails only when no category at all could be loaded.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let mut parts = BTreeMap::new();

        for category in Category::ALL {
            let Some(path) = self.locate(category) else {
                warn!("Component file for {category} not found in {}", self.data_dir.display());
                continue;
            };

            match load_category(category, &path) {
                Ok(items) => {
                    info!("Loaded {} {category} components", items.len());
                    parts.insert(category, items);
                }
                Err(err) => warn!("Skipping {category}: {err}"),
            }
        }

        if parts.is_empty() {
            return Err(CatalogError::NoCategories {
                data_dir: self.data_dir.clone(),
            });
        }

        Ok(Catalog { parts })
    }

    /// Resolves the document path, accepting a non-breaking hyphen
    /// (U+2011) in place of `-` in the file name.
    fn locate(&self, category: Category) -> Option<PathBuf> {
        let standard = self.data_dir.join(category.file_name());
        if standard.is_file() {
            return Some(standard);
        }
        let alternate = self
            .data_dir
            .join(category.file_name().replace('-', "\u{2011}"));
        alternate.is_file().then_some(alternate)
    }
}

fn load_category(category: Category, path: &Path) -> Result<Vec<Part>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut parts = Vec::with_capacity(records.len());
    let mut unpriced = 0usize;
    for (i, record) in records.iter().enumerate() {
        match parse_part(category, record) {
            Ok(part) => parts.push(part),
            Err(PartError::MissingPrice | PartError::NonPositivePrice(_)) => unpriced += 1,
            Err(err) => warn!("Dropping {category} record #{i}: {err}"),
        }
    }
    if unpriced > 0 {
        debug!("Dropped {unpriced} unpriced {category} records");
    }

    Ok(parts)
}
