//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::artwork::Artwork;

/// The creature to be guessed this round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Puzzle {
    /// National dex number
    pub id: u16,
    /// Lowercase canonical PokeAPI identifier, e.g. `mr-mime`
    pub name: String,
    /// Default front sprite
    pub image_url: Option<String>,
}

impl Puzzle {
    /// Name for display: each hyphen-separated part capitalized.
    pub fn display_name(&self) -> String {
        self.name
            .split('-')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join("-")
    }
}

/// Outcome of the current round's guess
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GuessResult {
    #[default]
    Unknown,
    Correct,
    Incorrect,
}

impl GuessResult {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, GuessResult::Unknown)
    }
}

/// Wins and losses across sessions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
}

impl Score {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    /// Count one resolved round. Each counter stops at `u32::MAX` instead
    /// of wrapping, so a maxed-out counter no longer moves.
    pub fn record(&mut self, result: GuessResult) {
        match result {
            GuessResult::Correct => self.wins = self.wins.saturating_add(1),
            GuessResult::Incorrect => self.losses = self.losses.saturating_add(1),
            GuessResult::Unknown => {}
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

/// Pokemon generations, each covering a contiguous national dex range
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    Gen1,
    Gen2,
    Gen3,
    Gen4,
    Gen5,
    Gen6,
    Gen7,
    Gen8,
    Gen9,
}

impl Generation {
    pub const ALL: [Generation; 9] = [
        Generation::Gen1,
        Generation::Gen2,
        Generation::Gen3,
        Generation::Gen4,
        Generation::Gen5,
        Generation::Gen6,
        Generation::Gen7,
        Generation::Gen8,
        Generation::Gen9,
    ];

    pub fn dex_range(&self) -> DexRange {
        let (first, last) = match self {
            Generation::Gen1 => (1, 151),
            Generation::Gen2 => (152, 251),
            Generation::Gen3 => (252, 386),
            Generation::Gen4 => (387, 493),
            Generation::Gen5 => (494, 649),
            Generation::Gen6 => (650, 721),
            Generation::Gen7 => (722, 809),
            Generation::Gen8 => (810, 905),
            Generation::Gen9 => (906, 1025),
        };
        DexRange { first, last }
    }
}

/// Inclusive range of national dex numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DexRange {
    pub first: u16,
    pub last: u16,
}

impl DexRange {
    pub fn len(&self) -> u32 {
        if self.last < self.first {
            0
        } else {
            u32::from(self.last - self.first) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the dex pool for a set of generations; empty means every generation.
pub fn dex_pool(generations: &[Generation]) -> Vec<DexRange> {
    let selected: &[Generation] = if generations.is_empty() {
        &Generation::ALL
    } else {
        generations
    };
    let mut pool: Vec<DexRange> = Vec::new();
    for generation in Generation::ALL {
        if selected.contains(&generation) {
            pool.push(generation.dex_range());
        }
    }
    pool
}

/// Total number of dex ids in the pool.
pub fn pool_size(pool: &[DexRange]) -> u32 {
    pool.iter().map(DexRange::len).sum()
}

/// Map an index in `0..pool_size(pool)` to a dex id.
pub fn pool_id_at(pool: &[DexRange], mut index: u32) -> Option<u16> {
    for range in pool {
        let len = range.len();
        if index < len {
            return u16::try_from(u32::from(range.first) + index).ok();
        }
        index -= len;
    }
    None
}

/// Animation timing for the loading indicator.
pub const LOADING_TICK_MS: u64 = 200;
pub const LOADING_DOT_CYCLE: u32 = 4;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Round (visible in debug) ---
    /// Puzzle lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Round", label = "Puzzle", debug_fmt)]
    pub puzzle: DataResource<Puzzle>,

    #[debug(section = "Round", label = "Guess", debug_fmt)]
    pub guess: GuessResult,

    /// Raw text of the guess that resolved this round
    #[debug(section = "Round", label = "Last guess", debug_fmt)]
    pub last_guess: Option<String>,

    #[debug(section = "Score", label = "Score", debug_fmt)]
    pub score: Score,

    #[debug(section = "Score", label = "Save error", debug_fmt)]
    pub save_error: Option<String>,

    // --- Internals (skipped) ---
    /// Sprite for the current puzzle
    #[debug(skip)]
    pub artwork: DataResource<Artwork>,

    /// Text currently in the guess field
    #[debug(skip)]
    pub guess_input: String,

    /// Dex ranges puzzles are drawn from
    #[debug(skip)]
    pub dex_pool: Vec<DexRange>,

    #[debug(skip)]
    pub rng_seed: u64,

    /// Loading animation frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    /// Create state with a persisted score and a dex pool
    pub fn new(score: Score, dex_pool: Vec<DexRange>) -> Self {
        Self {
            puzzle: DataResource::Empty,
            guess: GuessResult::Unknown,
            last_guess: None,
            score,
            save_error: None,
            artwork: DataResource::Empty,
            guess_input: String::new(),
            dex_pool,
            rng_seed: seed_from_time(),
            tick_count: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn current_puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.data()
    }

    /// Guesses are only accepted once the puzzle is loaded and unresolved.
    pub fn accepts_guess(&self) -> bool {
        self.puzzle.is_loaded() && !self.guess.is_resolved()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Score::default(), dex_pool(&[]))
    }
}

fn seed_from_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() << 32) ^ now.subsec_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_capitalizes_parts() {
        let puzzle = Puzzle {
            id: 122,
            name: "mr-mime".into(),
            image_url: None,
        };
        assert_eq!(puzzle.display_name(), "Mr-Mime");

        let puzzle = Puzzle {
            id: 25,
            name: "pikachu".into(),
            image_url: None,
        };
        assert_eq!(puzzle.display_name(), "Pikachu");
    }

    #[test]
    fn test_score_record() {
        let mut score = Score::default();
        score.record(GuessResult::Correct);
        score.record(GuessResult::Incorrect);
        score.record(GuessResult::Incorrect);
        score.record(GuessResult::Unknown);
        assert_eq!(score, Score::new(1, 2));
        assert_eq!(score.rounds(), 3);
    }

    #[test]
    fn test_score_record_caps_at_max() {
        let mut score = Score::new(u32::MAX, 0);
        score.record(GuessResult::Correct);
        score.record(GuessResult::Incorrect);

        assert_eq!(score, Score::new(u32::MAX, 1));
        assert_eq!(score.rounds(), u32::MAX);
    }

    #[test]
    fn test_dex_pool_defaults_to_every_generation() {
        let pool = dex_pool(&[]);
        assert_eq!(pool.len(), 9);
        assert_eq!(pool_size(&pool), 1025);
        assert_eq!(pool_id_at(&pool, 0), Some(1));
        assert_eq!(pool_id_at(&pool, 1024), Some(1025));
        assert_eq!(pool_id_at(&pool, 1025), None);
    }

    #[test]
    fn test_dex_pool_spans_selected_generations() {
        // Order of the flags does not matter
        let pool = dex_pool(&[Generation::Gen3, Generation::Gen1]);
        assert_eq!(pool_size(&pool), 151 + 135);
        assert_eq!(pool_id_at(&pool, 150), Some(151));
        assert_eq!(pool_id_at(&pool, 151), Some(252));
        assert_eq!(pool_id_at(&pool, 285), Some(386));
    }

    #[test]
    fn test_generations_are_contiguous() {
        let mut next = 1;
        for generation in Generation::ALL {
            let range = generation.dex_range();
            assert_eq!(range.first, next, "{generation:?}");
            next = range.last + 1;
        }
    }

    #[test]
    fn test_accepts_guess_only_when_loaded_and_unresolved() {
        let mut state = AppState::default();
        assert!(!state.accepts_guess());

        state.puzzle = DataResource::Loading;
        assert!(!state.accepts_guess());

        state.puzzle = DataResource::Loaded(Puzzle {
            id: 25,
            name: "pikachu".into(),
            image_url: None,
        });
        assert!(state.accepts_guess());

        state.guess = GuessResult::Correct;
        assert!(!state.accepts_guess());
    }
}
