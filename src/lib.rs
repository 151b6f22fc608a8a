#![doc(test(attr(deny(warnings))))]

//! Nomenclature Editor provides the edit session behind the parts-nomenclature
//! screen: dirty tracking, article lookup, mandatory-field checks, and the
//! save-or-discard close gate, plus a small terminal shell to drive it.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

/// Installs the tracing subscriber. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}
