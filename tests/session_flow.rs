mod common;

use chrono::NaiveDate;
use common::{empty_store, fixed_clock, sample_catalog};
use nomenclature_editor::{
    core::{CloseOutcome, CommitOutcome, EditSession, NomenclatureStore},
    domain::{EditMode, Field, LaunchParams, RecordKey},
    errors::EditorError,
    storage::{JsonArticleCatalog, JsonNomenclatureStore, MemoryNomenclatureStore},
};
use tempfile::tempdir;

fn key() -> RecordKey {
    RecordKey::new("ART1", "12", "A")
}

#[test]
fn create_then_modify_through_json_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nomenclatures.json");

    let mut session = EditSession::open(
        LaunchParams::create(key()),
        sample_catalog(),
        JsonNomenclatureStore::new(path.clone()),
    )
    .unwrap()
    .with_clock(fixed_clock());
    assert!(!session.is_dirty());

    session.edit_text(Field::Label, "Sous-ensemble moteur").unwrap();
    assert_eq!(session.on_type_changed(2).unwrap(), 5);
    session
        .edit_date(Field::ValidFrom, NaiveDate::from_ymd_opt(2024, 1, 1))
        .unwrap();
    assert_eq!(session.confirm().unwrap(), CloseOutcome::Saved);

    let stored = JsonNomenclatureStore::new(path.clone())
        .load(&key())
        .unwrap()
        .expect("record written");
    assert_eq!(stored.label, "Sous-ensemble moteur");
    assert_eq!(stored.modified_at, fixed_clock().0);

    let mut session = EditSession::open(
        LaunchParams::modify(key()),
        sample_catalog(),
        JsonNomenclatureStore::new(path.clone()),
    )
    .unwrap();
    assert_eq!(session.values().classification, Some(5));
    assert!(session.is_locked(Field::ArticleCode));
    assert!(matches!(
        session.edit_text(Field::NomenclatureIndex, "B"),
        Err(EditorError::ReadOnlyField(Field::NomenclatureIndex))
    ));

    session.edit_text(Field::Label, "Sous-ensemble moteur v2").unwrap();
    let outcome = session.request_close(&mut |_: &str| true).unwrap();
    assert_eq!(outcome, CloseOutcome::Saved);

    let records = JsonNomenclatureStore::new(path).records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, "Sous-ensemble moteur v2");
}

#[test]
fn unknown_article_blocks_nothing_but_the_field() {
    let mut session =
        EditSession::initialize(LaunchParams::create(key()), sample_catalog(), empty_store());

    session.edit_text(Field::ArticleCode, "NOPE").unwrap();
    let err = session.on_article_code_committed("NOPE").unwrap_err();
    assert_eq!(err.to_string(), "Article inexistant.");
    assert_eq!(session.values().article_code, "");
    assert_eq!(session.take_focus(), Some(Field::ArticleCode));
    assert!(session.is_dirty());

    let outcome = session.on_article_code_committed("ART2").unwrap();
    match outcome {
        CommitOutcome::Resolved(labels) => {
            assert_eq!(labels.secondary_label.as_deref(), Some("acier"))
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(session.values().article_code, "ART2");
}

#[test]
fn declining_the_close_prompt_leaves_store_untouched() {
    let mut session = EditSession::initialize(
        LaunchParams::new(EditMode::Create, key()),
        sample_catalog(),
        empty_store(),
    );
    session.edit_text(Field::Label, "Brouillon").unwrap();

    let mut asked = Vec::new();
    let outcome = session
        .request_close(&mut |message: &str| {
            asked.push(message.to_string());
            false
        })
        .unwrap();

    assert_eq!(outcome, CloseOutcome::Discarded);
    assert_eq!(asked.len(), 1);
    assert!(asked[0].contains("Voulez-vous les enregistrer"));
    assert!(session.store().is_empty());
    assert_eq!(session.store().save_calls(), 0);
}

#[test]
fn failed_save_on_close_keeps_the_session_open() {
    let mut session = EditSession::initialize(
        LaunchParams::create(key()),
        sample_catalog(),
        MemoryNomenclatureStore::rejecting("disque plein"),
    );
    session.edit_text(Field::Label, "Carter").unwrap();
    session.on_type_changed(1).unwrap();

    let err = session.request_close(&mut |_: &str| true).unwrap_err();
    assert!(matches!(err, EditorError::Persistence(reason) if reason.contains("disque plein")));
    assert!(!session.is_closed());
    assert!(session.is_dirty());
    assert_eq!(session.mode(), EditMode::Create);
    assert_eq!(session.effective_mode(), EditMode::Create);
}

#[test]
fn json_catalog_feeds_the_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(
        &path,
        r#"{"articles":[{"code":"ART9","label":"Joint torique","secondary_label":null}]}"#,
    )
    .unwrap();
    let catalog = JsonArticleCatalog::from_path(&path).unwrap();

    let mut session = EditSession::initialize(
        LaunchParams::create(RecordKey::new("", "1", "A")),
        catalog,
        empty_store(),
    );
    assert!(matches!(
        session.on_article_picked("ART9").unwrap(),
        CommitOutcome::Resolved(_)
    ));
    assert_eq!(session.article_labels().map(|l| l.label.as_str()), Some("Joint torique"));
}
