mod common;

use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use nomenclature_editor::{
    core::{EditSession, NomenclatureStore},
    domain::{Field, LaunchParams, NomenclatureRecord, NomenclatureType, RecordKey},
    errors::EditorError,
    storage::JsonNomenclatureStore,
    utils::persistence::tmp_path,
};
use tempfile::tempdir;

fn record(label: &str) -> NomenclatureRecord {
    NomenclatureRecord {
        key: RecordKey::new("ART1", "12", "A"),
        label: label.into(),
        nomenclature_type: Some(NomenclatureType::new(3)),
        valid_from: NaiveDate::from_ymd_opt(2024, 1, 1),
        valid_to: None,
        modified_at: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
    }
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nomenclatures.json");
    let mut store = JsonNomenclatureStore::new(path.clone());
    store.save(&record("Original")).expect("initial save");
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory at the staging path makes the write fail.
    let staging = tmp_path(&path);
    fs::create_dir_all(&staging).unwrap();

    assert!(store.save(&record("Changed")).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    let _ = fs::remove_dir_all(&staging);
}

#[test]
fn failed_store_write_surfaces_as_persistence_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nomenclatures.json");
    fs::create_dir_all(tmp_path(&path)).unwrap();

    let mut session = EditSession::initialize(
        LaunchParams::create(RecordKey::new("ART1", "12", "A")),
        common::sample_catalog(),
        JsonNomenclatureStore::new(path.clone()),
    );
    session.edit_text(Field::Label, "Carter").unwrap();
    session.on_type_changed(4).unwrap();

    assert!(matches!(session.save(), Err(EditorError::Persistence(_))));
    assert!(session.is_dirty());
    assert!(!path.exists());
}

#[test]
fn stored_document_keeps_dates_as_iso_strings() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nomenclatures.json");
    let mut store = JsonNomenclatureStore::new(path.clone());
    store.save(&record("Carter")).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored = &value["records"][0];
    assert_eq!(stored["valid_from"], "2024-01-01");
    assert_eq!(stored["nomenclature_type"], 3);
    assert!(stored.get("valid_to").is_none());
    assert_eq!(stored["key"]["article_code"], "ART1");
}

#[test]
fn records_from_other_keys_survive_a_save() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nomenclatures.json");
    let mut store = JsonNomenclatureStore::new(path.clone());

    let mut other = record("Autre");
    other.key = RecordKey::new("ART2", "1", "A").with_sequence(Some(4));
    store.save(&other).unwrap();
    store.save(&record("Carter")).unwrap();
    store.save(&record("Carter v2")).unwrap();

    let reloaded = JsonNomenclatureStore::new(path);
    assert_eq!(reloaded.records().unwrap().len(), 2);
    assert_eq!(reloaded.load(&other.key).unwrap(), Some(other));
}
