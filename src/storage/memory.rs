use std::{cell::Cell, collections::BTreeMap};

use crate::{
    core::services::{ArticleLookup, NomenclatureStore},
    domain::{ArticleLabels, NomenclatureRecord, RecordKey},
    errors::StoreError,
};

/// Article catalog held in memory. Counts lookups and can be told to fail
/// every one of them.
#[derive(Debug, Default)]
pub struct MemoryArticleCatalog {
    articles: BTreeMap<String, ArticleLabels>,
    calls: Cell<usize>,
    fail_with: Option<String>,
}

impl MemoryArticleCatalog {
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, labels: ArticleLabels) {
        self.articles.insert(code.into(), labels);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ArticleLookup for MemoryArticleCatalog {
    fn resolve_label(&self, article_code: &str) -> Result<Option<ArticleLabels>, StoreError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = &self.fail_with {
            return Err(StoreError::Rejected(reason.clone()));
        }
        Ok(self.articles.get(article_code.trim()).cloned())
    }
}

/// Nomenclature store held in memory. Can be told to reject every save.
#[derive(Debug, Default)]
pub struct MemoryNomenclatureStore {
    records: BTreeMap<RecordKey, NomenclatureRecord>,
    save_calls: usize,
    reject_with: Option<String>,
}

impl MemoryNomenclatureStore {
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, record: NomenclatureRecord) {
        self.records.insert(record.key.clone(), record);
    }

    pub fn get(&self, key: &RecordKey) -> Option<&NomenclatureRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of save attempts, rejected ones included.
    pub fn save_calls(&self) -> usize {
        self.save_calls
    }
}

impl NomenclatureStore for MemoryNomenclatureStore {
    fn load(&self, key: &RecordKey) -> Result<Option<NomenclatureRecord>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, record: &NomenclatureRecord) -> Result<(), StoreError> {
        self.save_calls += 1;
        if let Some(reason) = &self.reject_with {
            return Err(StoreError::Rejected(reason.clone()));
        }
        self.insert(record.clone());
        Ok(())
    }
}
