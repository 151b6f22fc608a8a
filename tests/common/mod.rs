#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use nomenclature_editor::{
    core::FixedClock,
    domain::ArticleLabels,
    storage::{ArticleEntry, JsonArticleCatalog, MemoryArticleCatalog, MemoryNomenclatureStore},
};
use tempfile::TempDir;

/// Timestamp stamped on every record saved through [`fixed_clock`].
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap())
}

pub fn sample_catalog() -> MemoryArticleCatalog {
    let mut catalog = MemoryArticleCatalog::default();
    catalog.insert("ART1", ArticleLabels::new("Roulement à billes"));
    catalog.insert(
        "ART2",
        ArticleLabels::new("Axe de transmission").with_secondary("acier"),
    );
    catalog.insert("BLANK", ArticleLabels::new("   "));
    catalog
}

pub fn empty_store() -> MemoryNomenclatureStore {
    MemoryNomenclatureStore::default()
}

/// Data directory holding an article catalog, as the shell expects it.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let catalog = JsonArticleCatalog::from_entries(vec![
            ArticleEntry {
                code: "ART1".into(),
                labels: ArticleLabels::new("Roulement à billes"),
            },
            ArticleEntry {
                code: "ART2".into(),
                labels: ArticleLabels::new("Axe de transmission"),
            },
        ]);
        catalog
            .write_to_path(&dir.path().join("articles.json"))
            .expect("write catalog");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("nomenclatures.json")
    }

    pub fn store_json(&self) -> String {
        std::fs::read_to_string(self.store_path()).unwrap_or_default()
    }
}
