use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fields tracked by the nomenclature screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ArticleCode,
    NomenclatureNumber,
    NomenclatureIndex,
    Label,
    Type,
    Classification,
    ValidFrom,
    ValidTo,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::ArticleCode,
        Field::NomenclatureNumber,
        Field::NomenclatureIndex,
        Field::Label,
        Field::Type,
        Field::Classification,
        Field::ValidFrom,
        Field::ValidTo,
    ];

    /// Fields locked once the record exists: they form its identity.
    pub const KEY_FIELDS: [Field; 3] = [
        Field::ArticleCode,
        Field::NomenclatureNumber,
        Field::NomenclatureIndex,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::ArticleCode => "Article",
            Field::NomenclatureNumber => "Numéro de nomenclature",
            Field::NomenclatureIndex => "Indice de nomenclature",
            Field::Label => "Libellé de nomenclature",
            Field::Type => "Type",
            Field::Classification => "Code de classification",
            Field::ValidFrom => "Début d'utilisation",
            Field::ValidTo => "Fin d'utilisation",
        }
    }

    /// Message shown when a mandatory field is left empty.
    pub fn required_message(self) -> &'static str {
        match self {
            Field::ArticleCode => "Article obligatoire.",
            Field::NomenclatureNumber => "Numéro de nomenclature obligatoire.",
            Field::NomenclatureIndex => "Indice de nomenclature obligatoire.",
            Field::Label => "Libellé de nomenclature obligatoire.",
            Field::Type => "Type obligatoire.",
            // the screen reports the classification check under the number label
            Field::Classification => "Numéro de nomenclature obligatoire.",
            Field::ValidFrom => "Début d'utilisation obligatoire.",
            Field::ValidTo => "Fin d'utilisation obligatoire.",
        }
    }

    /// Short name accepted by the shell (`set label …`).
    pub fn short_name(self) -> &'static str {
        match self {
            Field::ArticleCode => "article",
            Field::NomenclatureNumber => "number",
            Field::NomenclatureIndex => "index",
            Field::Label => "label",
            Field::Type => "type",
            Field::Classification => "classification",
            Field::ValidFrom => "from",
            Field::ValidTo => "to",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field `{}`", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "article" | "article_code" | "cod_art" => Field::ArticleCode,
            "number" | "nomenclature_number" | "cod_nom" => Field::NomenclatureNumber,
            "index" | "nomenclature_index" | "ind_nom" => Field::NomenclatureIndex,
            "label" | "lib_nom" => Field::Label,
            "type" | "typ_nom" => Field::Type,
            "classification" | "ecod_nom" => Field::Classification,
            "from" | "valid_from" | "dat_debuti" => Field::ValidFrom,
            "to" | "valid_to" | "dat_finuti" => Field::ValidTo,
            _ => return Err(UnknownField(s.to_string())),
        };
        Ok(field)
    }
}
