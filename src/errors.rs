use std::fmt;

use thiserror::Error;

use crate::domain::{Field, RecordKey};

/// A mandatory field was left empty. Carries the field the screen must refocus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
}

impl ValidationError {
    pub fn new(field: Field) -> Self {
        Self { field }
    }

    pub fn message(&self) -> &'static str {
        self.field.required_message()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Failures raised by the edit session. Every variant is recoverable by the user.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Article inexistant.")]
    ArticleNotFound(String),
    #[error("Enregistrement impossible : {0}")]
    Persistence(String),
    #[error("Le champ {} est en lecture seule.", .0.label())]
    ReadOnlyField(Field),
    #[error("Valeur invalide pour {field} : `{value}`")]
    InvalidValue { field: Field, value: String },
    #[error("Nomenclature introuvable : {0}")]
    RecordNotFound(RecordKey),
    #[error("La fenêtre est fermée.")]
    SessionClosed,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Error type returned by lookup and persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}
