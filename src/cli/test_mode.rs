//! Scripted answers for prompts, so the shell can run unattended.
//!
//! `NOMENCLATURE_CLI_CONFIRM` holds `|`-separated answers (`yes`, `no`, `y`,
//! `n`, `1`, `0`) consumed in order by confirmation prompts.

use once_cell::sync::Lazy;
use std::{
    collections::VecDeque,
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const CONFIRM_ENV: &str = "NOMENCLATURE_CLI_CONFIRM";

struct ConfirmQueue {
    enabled: bool,
    answers: VecDeque<bool>,
}

impl ConfirmQueue {
    fn from_env() -> Self {
        match env::var(CONFIRM_ENV) {
            Ok(raw) => Self {
                enabled: true,
                answers: parse_answers(&raw),
            },
            Err(_) => Self::new(),
        }
    }

    fn new() -> Self {
        Self {
            enabled: false,
            answers: VecDeque::new(),
        }
    }
}

static CONFIRMATIONS: Lazy<Mutex<ConfirmQueue>> =
    Lazy::new(|| Mutex::new(ConfirmQueue::from_env()));

fn queue() -> MutexGuard<'static, ConfirmQueue> {
    CONFIRMATIONS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
pub fn is_enabled() -> bool {
    queue().enabled
}

/// Next scripted answer, `None` when scripting is off or the answers ran out.
pub fn next_confirmation(label: &str) -> Option<bool> {
    let mut guard = queue();
    if !guard.enabled {
        return None;
    }
    let answer = guard.answers.pop_front();
    if answer.is_none() {
        tracing::warn!(prompt = label, "scripted confirmations exhausted");
    }
    answer
}

#[cfg(test)]
pub fn install_confirmations(answers: Vec<bool>) {
    let mut guard = queue();
    guard.enabled = true;
    guard.answers = answers.into();
}

#[cfg(test)]
pub fn reset_confirmations() {
    let mut guard = queue();
    guard.enabled = false;
    guard.answers.clear();
}

fn parse_answer(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "o" | "oui" | "true" | "1" => Some(true),
        "n" | "no" | "non" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_answers(raw: &str) -> VecDeque<bool> {
    raw.split('|').filter_map(parse_answer).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers_and_skips_noise() {
        let answers: Vec<bool> = parse_answers("yes| n |oui|maybe|0").into();
        assert_eq!(answers, vec![true, false, true, false]);
    }

    #[test]
    fn installed_answers_are_consumed_in_order() {
        install_confirmations(vec![false, true]);
        assert!(is_enabled());
        assert_eq!(next_confirmation("first"), Some(false));
        assert_eq!(next_confirmation("second"), Some(true));
        assert_eq!(next_confirmation("third"), None);
        reset_confirmations();
        assert_eq!(next_confirmation("off"), None);
    }
}
