//! Collaborators the edit session calls out to but does not implement.

use crate::{
    domain::{ArticleLabels, NomenclatureRecord, RecordKey},
    errors::StoreError,
};

/// Resolves article codes against the article catalog.
pub trait ArticleLookup {
    /// Returns the labels of `article_code`, or `None` when the catalog has no entry.
    fn resolve_label(&self, article_code: &str) -> Result<Option<ArticleLabels>, StoreError>;
}

/// Reads and writes nomenclature records.
pub trait NomenclatureStore {
    fn load(&self, key: &RecordKey) -> Result<Option<NomenclatureRecord>, StoreError>;

    /// Inserts or replaces the record stored under `record.key`.
    fn save(&mut self, record: &NomenclatureRecord) -> Result<(), StoreError>;
}
