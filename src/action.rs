//! Actions for the round lifecycle, guesses, artwork and score

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::state::Puzzle;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Round category =====
    /// Intent: fetch a new puzzle (also retries a failed fetch)
    RoundStart,

    /// Result: puzzle fetched
    RoundDidLoad(Puzzle),

    /// Result: puzzle fetch failed
    RoundDidError(String),

    /// Intent: play again once the guess is resolved
    RoundAdvance,

    // ===== Guess category =====
    /// Guess field text changed
    GuessInputChange(String),

    /// Submit a guess for the current puzzle
    GuessSubmit(String),

    // ===== Artwork category =====
    /// Result: sprite decoded for puzzle `id`
    ArtworkDidLoad { id: u16, artwork: Artwork },

    /// Result: sprite fetch or decode failed for puzzle `id`
    ArtworkDidError { id: u16, error: String },

    // ===== Score category =====
    ScoreReset,
    ScoreDidSave,
    ScoreDidError(String),

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement)
    Render,

    /// Periodic tick for the loading animation
    Tick,

    Quit,
}
