//! Guess checking

use crate::state::GuessResult;

/// Case-fold and drop every space and period.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_correct(input: &str, name: &str) -> bool {
    normalize(input) == name
}

/// Evaluate a non-empty guess against the puzzle name.
pub fn evaluate(input: &str, name: &str) -> GuessResult {
    if is_correct(input, name) {
        GuessResult::Correct
    } else {
        GuessResult::Incorrect
    }
}
