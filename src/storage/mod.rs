//! Concrete article catalogs and nomenclature stores.

pub mod json_backend;
pub mod memory;

pub use json_backend::{ArticleEntry, JsonArticleCatalog, JsonNomenclatureStore, STORE_SCHEMA_VERSION};
pub use memory::{MemoryArticleCatalog, MemoryNomenclatureStore};
