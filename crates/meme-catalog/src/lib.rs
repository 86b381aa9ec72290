//! # meme-catalog
//!
//! Template metadata for the meme render service: [`TemplateDescriptor`] per template id, the
//! keyword alias table, and [`CatalogStore`] which hands out immutable snapshots.

mod catalog;
mod descriptor;
mod store;

pub use catalog::{Catalog, CatalogError};
pub use descriptor::{ParamsType, TemplateDescriptor};
pub use store::CatalogStore;
