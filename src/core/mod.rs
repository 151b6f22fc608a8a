pub mod services;
pub mod session;
pub mod time;
pub mod utils;

pub use services::{ArticleLookup, NomenclatureStore};
pub use session::{ClosePrompt, CloseOutcome, CommitOutcome, EditSession, FieldValues};
pub use time::{Clock, FixedClock, SystemClock};
