//! Hardware part catalog.
//!
//! One JSON document per [`Category`], each a sequence of records with at
//! least `name` and `price` plus category-specific keys. Records become
//! [`Part`]s carrying a [`PartSpec`] variant for their category.
//!
//! Unpriced or malformed records are dropped individually. A missing
//! category document is a warning; a catalog with no categories at all
//! is a [`CatalogError`].

mod loader;
mod record;
mod types;

pub use loader::{Catalog, CatalogError, CatalogLoader};
pub use record::{parse_part, PartError};
pub use types::{Category, Part, PartSpec};
