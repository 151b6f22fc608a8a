use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification code used for any type outside the known range.
pub const DEFAULT_CLASSIFICATION: u32 = 6;

/// Raw "type" selection of a nomenclature. Values 1 to 4 are the known types;
/// anything else is kept as entered and classified with the default code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NomenclatureType(pub u32);

impl NomenclatureType {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_known(self) -> bool {
        (1..=4).contains(&self.0)
    }

    /// Secondary classification code derived from the type.
    pub fn classification(self) -> u32 {
        match self.0 {
            1 => 4,
            2 => 5,
            3 => 1,
            4 => 3,
            _ => DEFAULT_CLASSIFICATION,
        }
    }
}

impl From<u32> for NomenclatureType {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NomenclatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_map_to_fixed_codes() {
        let mapped: Vec<u32> = (1..=4)
            .map(|raw| NomenclatureType::new(raw).classification())
            .collect();
        assert_eq!(mapped, vec![4, 5, 1, 3]);
    }

    #[test]
    fn unknown_types_fall_back_to_default_code() {
        assert_eq!(NomenclatureType::new(0).classification(), DEFAULT_CLASSIFICATION);
        assert_eq!(NomenclatureType::new(99).classification(), DEFAULT_CLASSIFICATION);
        assert!(!NomenclatureType::new(99).is_known());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&NomenclatureType::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
