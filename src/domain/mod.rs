pub mod common;
pub mod field;
pub mod kind;
pub mod record;

pub use common::Displayable;
pub use field::Field;
pub use kind::NomenclatureType;
pub use record::{ArticleLabels, EditMode, LaunchParams, NomenclatureRecord, RecordKey};
