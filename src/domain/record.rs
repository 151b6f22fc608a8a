use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{common::Displayable, kind::NomenclatureType};

/// How the screen was opened. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    Create,
    Modify,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Create => f.write_str("create"),
            EditMode::Modify => f.write_str("modify"),
        }
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "new" | "0" => Ok(EditMode::Create),
            "modify" | "edit" | "1" => Ok(EditMode::Modify),
            other => Err(format!("unknown mode `{}` (expected create or modify)", other)),
        }
    }
}

/// Identity of a nomenclature record in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub article_code: String,
    pub nomenclature_number: String,
    pub nomenclature_index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

impl RecordKey {
    pub fn new(
        article_code: impl Into<String>,
        nomenclature_number: impl Into<String>,
        nomenclature_index: impl Into<String>,
    ) -> Self {
        Self {
            article_code: article_code.into(),
            nomenclature_number: nomenclature_number.into(),
            nomenclature_index: nomenclature_index.into(),
            sequence: None,
        }
    }

    pub fn with_sequence(mut self, sequence: Option<u32>) -> Self {
        self.sequence = sequence;
        self
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.article_code, self.nomenclature_number, self.nomenclature_index
        )?;
        if let Some(sequence) = self.sequence {
            write!(f, "#{}", sequence)?;
        }
        Ok(())
    }
}

/// Parameters the caller hands to the screen when opening it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub mode: EditMode,
    pub key: RecordKey,
}

impl LaunchParams {
    pub fn new(mode: EditMode, key: RecordKey) -> Self {
        Self { mode, key }
    }

    pub fn create(key: RecordKey) -> Self {
        Self::new(EditMode::Create, key)
    }

    pub fn modify(key: RecordKey) -> Self {
        Self::new(EditMode::Modify, key)
    }
}

/// Labels the article catalog returns for an article code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLabels {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_label: Option<String>,
}

impl ArticleLabels {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            secondary_label: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_label = Some(secondary.into());
        self
    }

    /// A result only counts as found when the primary label has visible text.
    pub fn is_usable(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

impl Displayable for ArticleLabels {
    fn display_label(&self) -> String {
        match self.secondary_label.as_deref().map(str::trim) {
            Some(secondary) if !secondary.is_empty() => {
                format!("{} ({})", self.label.trim(), secondary)
            }
            _ => self.label.trim().to_string(),
        }
    }
}

/// Persisted shape of a nomenclature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NomenclatureRecord {
    pub key: RecordKey,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomenclature_type: Option<NomenclatureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    pub modified_at: DateTime<Utc>,
}

impl Displayable for NomenclatureRecord {
    fn display_label(&self) -> String {
        format!("{} {}", self.key, self.label)
    }
}
