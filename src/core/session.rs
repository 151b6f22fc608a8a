//! Edit session behind the nomenclature screen.
//!
//! The session owns the field values of one record, tracks whether they
//! changed since the last load or save, and drives the article lookup, the
//! mandatory-field check, the save, and the save-or-discard close gate. Each
//! screen instance owns exactly one session; every operation takes `&mut self`
//! so events are handled one at a time.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::{
    core::{
        services::{ArticleLookup, NomenclatureStore},
        time::{Clock, SystemClock},
    },
    domain::{
        ArticleLabels, Displayable, EditMode, Field, LaunchParams, NomenclatureRecord,
        NomenclatureType, RecordKey,
    },
    errors::{EditorError, ValidationError},
};

/// Question asked when closing a session with unsaved changes.
pub const UNSAVED_CHANGES_PROMPT: &str =
    "Vous avez fait des modifications.\nVoulez-vous les enregistrer ?";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Answers the save-on-close question.
pub trait ClosePrompt {
    fn confirm_save(&mut self, message: &str) -> Result<bool, EditorError>;
}

impl<F> ClosePrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm_save(&mut self, message: &str) -> Result<bool, EditorError> {
        Ok(self(message))
    }
}

/// Result of committing an article code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Blank code, nothing was looked up.
    Skipped,
    Resolved(ArticleLabels),
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nothing to save.
    Closed,
    Saved,
    Discarded,
}

/// Current values of the screen fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub article_code: String,
    pub nomenclature_number: String,
    pub nomenclature_index: String,
    pub sequence: Option<u32>,
    pub label: String,
    pub nomenclature_type: Option<NomenclatureType>,
    pub classification: Option<u32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

impl FieldValues {
    fn from_key(key: &RecordKey) -> Self {
        Self {
            article_code: key.article_code.clone(),
            nomenclature_number: key.nomenclature_number.clone(),
            nomenclature_index: key.nomenclature_index.clone(),
            sequence: key.sequence,
            ..Self::default()
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(
            self.article_code.clone(),
            self.nomenclature_number.clone(),
            self.nomenclature_index.clone(),
        )
        .with_sequence(self.sequence)
    }

    /// First mandatory field left empty, checked in screen order.
    pub fn first_violation(&self) -> Option<Field> {
        if is_blank(&self.article_code) {
            return Some(Field::ArticleCode);
        }
        if matches!(self.classification, None | Some(0)) {
            return Some(Field::Classification);
        }
        if is_blank(&self.nomenclature_index) {
            return Some(Field::NomenclatureIndex);
        }
        if is_blank(&self.label) {
            return Some(Field::Label);
        }
        if self.nomenclature_type.is_none() {
            return Some(Field::Type);
        }
        None
    }

    /// Field value rendered as text, empty when unset.
    pub fn display(&self, field: Field) -> String {
        match field {
            Field::ArticleCode => self.article_code.clone(),
            Field::NomenclatureNumber => self.nomenclature_number.clone(),
            Field::NomenclatureIndex => self.nomenclature_index.clone(),
            Field::Label => self.label.clone(),
            Field::Type => self
                .nomenclature_type
                .map(|kind| kind.to_string())
                .unwrap_or_default(),
            Field::Classification => self
                .classification
                .map(|code| code.to_string())
                .unwrap_or_default(),
            Field::ValidFrom => format_date(self.valid_from),
            Field::ValidTo => format_date(self.valid_to),
        }
    }
}

/// One live editing session over a nomenclature record.
pub struct EditSession<L, S> {
    mode: EditMode,
    record_exists: bool,
    values: FieldValues,
    article_labels: Option<ArticleLabels>,
    locked: BTreeSet<Field>,
    dirty: bool,
    focus: Option<Field>,
    last_saved_at: Option<DateTime<Utc>>,
    closed: bool,
    lookup: L,
    store: S,
    clock: Box<dyn Clock>,
}

impl<L, S> EditSession<L, S>
where
    L: ArticleLookup,
    S: NomenclatureStore,
{
    /// Seeds a clean session from the launch parameters. In Modify mode the
    /// identity fields are locked.
    pub fn initialize(params: LaunchParams, lookup: L, store: S) -> Self {
        let locked = match params.mode {
            EditMode::Create => BTreeSet::new(),
            EditMode::Modify => Field::KEY_FIELDS.into_iter().collect(),
        };
        debug!(mode = %params.mode, key = %params.key, "initializing nomenclature session");
        Self {
            mode: params.mode,
            record_exists: params.mode == EditMode::Modify,
            values: FieldValues::from_key(&params.key),
            article_labels: None,
            locked,
            dirty: false,
            focus: None,
            last_saved_at: None,
            closed: false,
            lookup,
            store,
            clock: Box::new(SystemClock),
        }
    }

    /// Like [`EditSession::initialize`], but in Modify mode also loads the
    /// stored record and seeds the editable fields from it.
    pub fn open(params: LaunchParams, lookup: L, store: S) -> Result<Self, EditorError> {
        let existing = match params.mode {
            EditMode::Create => None,
            EditMode::Modify => {
                let record = store
                    .load(&params.key)
                    .map_err(|err| EditorError::Persistence(err.to_string()))?
                    .ok_or_else(|| EditorError::RecordNotFound(params.key.clone()))?;
                Some(record)
            }
        };
        let mut session = Self::initialize(params, lookup, store);
        if let Some(record) = existing {
            session.apply_record(&record);
        }
        Ok(session)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn apply_record(&mut self, record: &NomenclatureRecord) {
        self.values.label = record.label.clone();
        self.values.nomenclature_type = record.nomenclature_type;
        self.values.classification = record.nomenclature_type.map(NomenclatureType::classification);
        self.values.valid_from = record.valid_from;
        self.values.valid_to = record.valid_to;
        self.last_saved_at = Some(record.modified_at);
    }

    /// Marks the session dirty. Called for every edit, even when the new
    /// value equals the old one.
    pub fn on_field_edited(&mut self, field: Field) {
        debug!(field = field.short_name(), "field edited");
        self.dirty = true;
    }

    /// Writes a field from its text form and marks the session dirty.
    /// Empty text clears optional fields. Type edits go through
    /// [`EditSession::on_type_changed`].
    pub fn edit_text(&mut self, field: Field, raw: &str) -> Result<(), EditorError> {
        self.ensure_editable(field)?;
        match field {
            Field::ArticleCode => self.values.article_code = raw.to_string(),
            Field::NomenclatureNumber => self.values.nomenclature_number = raw.to_string(),
            Field::NomenclatureIndex => self.values.nomenclature_index = raw.to_string(),
            Field::Label => self.values.label = raw.to_string(),
            Field::Type => {
                let value = parse_number(field, raw)?.ok_or_else(|| invalid(field, raw))?;
                self.on_type_changed(value)?;
                return Ok(());
            }
            Field::Classification => self.values.classification = parse_number(field, raw)?,
            Field::ValidFrom | Field::ValidTo => {
                let date = parse_date(field, raw)?;
                return self.edit_date(field, date);
            }
        }
        self.on_field_edited(field);
        Ok(())
    }

    pub fn edit_date(&mut self, field: Field, date: Option<NaiveDate>) -> Result<(), EditorError> {
        self.ensure_editable(field)?;
        match field {
            Field::ValidFrom => self.values.valid_from = date,
            Field::ValidTo => self.values.valid_to = date,
            other => {
                return Err(invalid(other, &format_date(date)));
            }
        }
        self.on_field_edited(field);
        Ok(())
    }

    /// Article code field lost focus. Blank codes are ignored; an unknown
    /// code is cleared and the field reopened for input. A locked code is
    /// never cleared, only reported.
    pub fn on_article_code_committed(&mut self, code: &str) -> Result<CommitOutcome, EditorError> {
        self.ensure_open()?;
        if is_blank(code) {
            return Ok(CommitOutcome::Skipped);
        }
        if self.is_locked(Field::ArticleCode) && code != self.values.article_code {
            return Err(EditorError::ReadOnlyField(Field::ArticleCode));
        }

        let resolved = match self.lookup.resolve_label(code) {
            Ok(Some(labels)) if labels.is_usable() => Some(labels),
            Ok(_) => None,
            Err(err) => {
                warn!(code, error = %err, "article lookup failed");
                None
            }
        };

        match resolved {
            Some(labels) => {
                if self.values.article_code != code {
                    self.values.article_code = code.to_string();
                    self.on_field_edited(Field::ArticleCode);
                }
                self.article_labels = Some(labels.clone());
                if self.focus == Some(Field::ArticleCode) {
                    self.focus = None;
                }
                Ok(CommitOutcome::Resolved(labels))
            }
            None => {
                warn!(code, "article not found");
                if !self.is_locked(Field::ArticleCode) {
                    self.values.article_code.clear();
                }
                self.article_labels = None;
                self.focus = Some(Field::ArticleCode);
                Err(EditorError::ArticleNotFound(code.to_string()))
            }
        }
    }

    /// Article chosen from the picker. Behaves like typing the code and
    /// leaving the field.
    pub fn on_article_picked(&mut self, selection: &str) -> Result<CommitOutcome, EditorError> {
        self.ensure_editable(Field::ArticleCode)?;
        if is_blank(selection) {
            return Ok(CommitOutcome::Skipped);
        }
        self.values.article_code = selection.to_string();
        self.on_field_edited(Field::ArticleCode);
        self.on_article_code_committed(selection)
    }

    /// Stores the new type and derives the classification code from it.
    /// Returns the derived code.
    pub fn on_type_changed(&mut self, raw: u32) -> Result<u32, EditorError> {
        self.ensure_editable(Field::Type)?;
        let kind = NomenclatureType::new(raw);
        let code = kind.classification();
        self.values.nomenclature_type = Some(kind);
        self.values.classification = Some(code);
        self.on_field_edited(Field::Type);
        if self.effective_mode() == EditMode::Modify {
            // the linked article must be checked again
            self.focus = Some(Field::ArticleCode);
        }
        Ok(code)
    }

    /// Checks mandatory fields and moves focus to the first empty one.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        match self.values.first_violation() {
            Some(field) => {
                self.focus = Some(field);
                Err(ValidationError::new(field))
            }
            None => Ok(()),
        }
    }

    pub fn save(&mut self) -> Result<(), EditorError> {
        self.ensure_open()?;
        self.validate()?;

        let record = NomenclatureRecord {
            key: self.values.key(),
            label: self.values.label.clone(),
            nomenclature_type: self.values.nomenclature_type,
            valid_from: self.values.valid_from,
            valid_to: self.values.valid_to,
            modified_at: self.clock.now(),
        };

        if let Err(err) = self.store.save(&record) {
            warn!(key = %record.key, error = %err, "nomenclature save failed");
            return Err(EditorError::Persistence(err.to_string()));
        }

        info!(record = %record.display_label(), "nomenclature saved");
        self.dirty = false;
        self.record_exists = true;
        self.last_saved_at = Some(record.modified_at);
        Ok(())
    }

    /// Close or cancel action. A dirty session asks whether to save first;
    /// a failed save keeps the session open.
    pub fn request_close<P>(&mut self, prompt: &mut P) -> Result<CloseOutcome, EditorError>
    where
        P: ClosePrompt + ?Sized,
    {
        self.ensure_open()?;
        if !self.dirty {
            return Ok(self.finish(CloseOutcome::Closed));
        }
        if prompt.confirm_save(UNSAVED_CHANGES_PROMPT)? {
            self.save()?;
            Ok(self.finish(CloseOutcome::Saved))
        } else {
            Ok(self.finish(CloseOutcome::Discarded))
        }
    }

    /// OK action: saves pending changes, then closes.
    pub fn confirm(&mut self) -> Result<CloseOutcome, EditorError> {
        self.ensure_open()?;
        if !self.dirty {
            return Ok(self.finish(CloseOutcome::Closed));
        }
        if let Err(err) = self.save() {
            if !matches!(err, EditorError::Validation(_)) {
                self.focus = Some(Field::ArticleCode);
            }
            return Err(err);
        }
        Ok(self.finish(CloseOutcome::Saved))
    }

    fn finish(&mut self, outcome: CloseOutcome) -> CloseOutcome {
        info!(?outcome, key = %self.values.key(), "nomenclature session closed");
        self.closed = true;
        self.focus = None;
        outcome
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.closed {
            Err(EditorError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn ensure_editable(&self, field: Field) -> Result<(), EditorError> {
        self.ensure_open()?;
        if self.is_locked(field) {
            Err(EditorError::ReadOnlyField(field))
        } else {
            Ok(())
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Modify once the record exists in the store, whatever the launch mode.
    pub fn effective_mode(&self) -> EditMode {
        if self.record_exists {
            EditMode::Modify
        } else {
            self.mode
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_locked(&self, field: Field) -> bool {
        self.locked.contains(&field)
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn key(&self) -> RecordKey {
        self.values.key()
    }

    pub fn article_labels(&self) -> Option<&ArticleLabels> {
        self.article_labels.as_ref()
    }

    /// Field the screen should return input focus to, if any.
    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn take_focus(&mut self) -> Option<Field> {
        self.focus.take()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn invalid(field: Field, raw: &str) -> EditorError {
    EditorError::InvalidValue {
        field,
        value: raw.to_string(),
    }
}

fn parse_number(field: Field, raw: &str) -> Result<Option<u32>, EditorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| invalid(field, raw))
}

fn parse_date(field: Field, raw: &str) -> Result<Option<NaiveDate>, EditorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid(field, raw))
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
