use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    core::services::{ArticleLookup, NomenclatureStore},
    domain::{ArticleLabels, NomenclatureRecord, RecordKey},
    errors::StoreError,
    utils::persistence::{read_json, write_json_atomic},
};

pub const STORE_SCHEMA_VERSION: u32 = 1;

/// One article of the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub code: String,
    #[serde(flatten)]
    pub labels: ArticleLabels,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    articles: Vec<ArticleEntry>,
}

/// Article catalog read once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonArticleCatalog {
    articles: BTreeMap<String, ArticleLabels>,
}

impl JsonArticleCatalog {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let document: CatalogDocument = read_json(path)?.ok_or_else(|| {
            StoreError::Rejected(format!("article catalog `{}` not found", path.display()))
        })?;
        debug!(path = %path.display(), count = document.articles.len(), "article catalog loaded");
        Ok(Self::from_entries(document.articles))
    }

    /// Loads the catalog, falling back to an empty one when the file is absent.
    pub fn load_or_empty(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            warn!(path = %path.display(), "article catalog missing, every lookup will fail");
            Ok(Self::default())
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ArticleEntry>) -> Self {
        let articles = entries
            .into_iter()
            .map(|entry| (entry.code.trim().to_string(), entry.labels))
            .collect();
        Self { articles }
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), StoreError> {
        let document = CatalogDocument {
            articles: self
                .articles
                .iter()
                .map(|(code, labels)| ArticleEntry {
                    code: code.clone(),
                    labels: labels.clone(),
                })
                .collect(),
        };
        write_json_atomic(&document, path)
    }

    /// Catalog entries ordered by code.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ArticleLabels)> {
        self.articles
            .iter()
            .map(|(code, labels)| (code.as_str(), labels))
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl ArticleLookup for JsonArticleCatalog {
    fn resolve_label(&self, article_code: &str) -> Result<Option<ArticleLabels>, StoreError> {
        Ok(self.articles.get(article_code.trim()).cloned())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: u32,
    #[serde(default)]
    records: Vec<NomenclatureRecord>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            records: Vec::new(),
        }
    }
}

/// Nomenclature records kept in a single JSON document, rewritten atomically
/// on every save.
#[derive(Debug, Clone)]
pub struct JsonNomenclatureStore {
    path: PathBuf,
}

impl JsonNomenclatureStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records, ordered by key.
    pub fn records(&self) -> Result<Vec<NomenclatureRecord>, StoreError> {
        Ok(self.read_document()?.records)
    }

    fn read_document(&self) -> Result<StoreDocument, StoreError> {
        let document: StoreDocument = read_json(&self.path)?.unwrap_or_default();
        if document.schema_version > STORE_SCHEMA_VERSION {
            return Err(StoreError::Rejected(format!(
                "`{}` uses schema version {} (supported: {})",
                self.path.display(),
                document.schema_version,
                STORE_SCHEMA_VERSION
            )));
        }
        Ok(document)
    }
}

impl NomenclatureStore for JsonNomenclatureStore {
    fn load(&self, key: &RecordKey) -> Result<Option<NomenclatureRecord>, StoreError> {
        Ok(self
            .read_document()?
            .records
            .into_iter()
            .find(|record| &record.key == key))
    }

    fn save(&mut self, record: &NomenclatureRecord) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        match document
            .records
            .iter_mut()
            .find(|existing| existing.key == record.key)
        {
            Some(existing) => *existing = record.clone(),
            None => document.records.push(record.clone()),
        }
        document.records.sort_by(|a, b| a.key.cmp(&b.key));
        document.schema_version = STORE_SCHEMA_VERSION;
        write_json_atomic(&document, &self.path)?;
        debug!(path = %self.path.display(), key = %record.key, "nomenclature store written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn record(index: &str, label: &str) -> NomenclatureRecord {
        NomenclatureRecord {
            key: RecordKey::new("ART1", "12", index),
            label: label.into(),
            nomenclature_type: None,
            valid_from: None,
            valid_to: None,
            modified_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn missing_store_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonNomenclatureStore::new(dir.path().join("store.json"));
        assert!(store.load(&record("A", "x").key).unwrap().is_none());
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"schema_version": 9, "records": []}"#).unwrap();
        let store = JsonNomenclatureStore::new(path);
        assert!(matches!(store.records(), Err(StoreError::Rejected(_))));
    }

    #[test]
    fn save_replaces_existing_record() {
        let dir = tempdir().unwrap();
        let mut store = JsonNomenclatureStore::new(dir.path().join("store.json"));
        store.save(&record("B", "first")).unwrap();
        store.save(&record("A", "other")).unwrap();
        store.save(&record("B", "second")).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.nomenclature_index, "A");
        assert_eq!(records[1].label, "second");
    }

    #[test]
    fn catalog_trims_codes_on_lookup() {
        let catalog = JsonArticleCatalog::from_entries(vec![ArticleEntry {
            code: "ART1".into(),
            labels: ArticleLabels::new("Roulement"),
        }]);
        let labels = catalog.resolve_label(" ART1 ").unwrap().unwrap();
        assert_eq!(labels.label, "Roulement");
        assert!(catalog.resolve_label("ART2").unwrap().is_none());
    }

    #[test]
    fn catalog_file_must_exist_unless_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.json");
        assert!(JsonArticleCatalog::from_path(&path).is_err());
        assert!(JsonArticleCatalog::load_or_empty(&path).unwrap().is_empty());
    }
}
