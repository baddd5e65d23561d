//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::guess;
use crate::state::{pool_id_at, pool_size, AppState, GuessResult};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Round actions =====
        Action::RoundStart => start_round(state),

        Action::RoundDidLoad(puzzle) => {
            if !state.puzzle.is_loading() {
                return DispatchResult::unchanged();
            }
            let effect = puzzle.image_url.clone().map(|url| Effect::FetchArtwork {
                id: puzzle.id,
                url,
            });
            state.artwork = match effect {
                Some(_) => DataResource::Loading,
                None => DataResource::Failed("no sprite available".into()),
            };
            state.puzzle = DataResource::Loaded(puzzle);
            state.guess = GuessResult::Unknown;
            match effect {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::RoundDidError(msg) => {
            if !state.puzzle.is_loading() {
                return DispatchResult::unchanged();
            }
            state.puzzle = DataResource::Failed(msg);
            DispatchResult::changed()
        }

        Action::RoundAdvance => {
            if !state.guess.is_resolved() {
                return DispatchResult::unchanged();
            }
            state.guess = GuessResult::Unknown;
            start_round(state)
        }

        // ===== Guess actions =====
        Action::GuessInputChange(text) => {
            if state.guess.is_resolved() || state.guess_input == text {
                return DispatchResult::unchanged();
            }
            state.guess_input = text;
            DispatchResult::changed()
        }

        Action::GuessSubmit(text) => submit_guess(state, text),

        // ===== Artwork actions =====
        Action::ArtworkDidLoad { id, artwork } => {
            if !is_current_puzzle(state, id) {
                return DispatchResult::unchanged();
            }
            state.artwork = DataResource::Loaded(artwork);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { id, error } => {
            if !is_current_puzzle(state, id) {
                return DispatchResult::unchanged();
            }
            state.artwork = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Score actions =====
        Action::ScoreReset => {
            state.score.wins = 0;
            state.score.losses = 0;
            DispatchResult::changed_with(Effect::SaveScore { score: state.score })
        }

        Action::ScoreDidSave => {
            if state.save_error.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ScoreDidError(msg) => {
            state.save_error = Some(msg);
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.puzzle.is_loading() || state.artwork.is_loading() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_round(state: &mut AppState) -> DispatchResult<Effect> {
    if state.puzzle.is_loading() {
        return DispatchResult::unchanged();
    }

    state.guess = GuessResult::Unknown;
    state.guess_input.clear();
    state.last_guess = None;
    state.artwork = DataResource::Empty;
    state.tick_count = 0;

    let size = pool_size(&state.dex_pool);
    if size == 0 {
        state.puzzle = DataResource::Failed("no dex numbers to draw from".into());
        return DispatchResult::changed();
    }
    let index = next_rand(state) % size;
    let Some(id) = pool_id_at(&state.dex_pool, index) else {
        state.puzzle = DataResource::Failed("no dex numbers to draw from".into());
        return DispatchResult::changed();
    };

    state.puzzle = DataResource::Loading;
    DispatchResult::changed_with(Effect::FetchPuzzle { id })
}

fn submit_guess(state: &mut AppState, text: String) -> DispatchResult<Effect> {
    if text.is_empty() || !state.accepts_guess() {
        return DispatchResult::unchanged();
    }
    let Some(puzzle) = state.current_puzzle() else {
        return DispatchResult::unchanged();
    };

    let result = guess::evaluate(&text, &puzzle.name);
    state.score.record(result);
    state.guess = result;
    state.last_guess = Some(text);
    state.guess_input.clear();
    DispatchResult::changed_with(Effect::SaveScore { score: state.score })
}

fn is_current_puzzle(state: &AppState, id: u16) -> bool {
    state.current_puzzle().is_some_and(|puzzle| puzzle.id == id)
}

fn next_rand(state: &mut AppState) -> u32 {
    state.rng_seed = state
        .rng_seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1);
    (state.rng_seed >> 32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Artwork;
    use crate::state::{dex_pool, Generation, Puzzle, Score};

    fn pikachu() -> Puzzle {
        Puzzle {
            id: 25,
            name: "pikachu".into(),
            image_url: Some("https://example.test/25.png".into()),
        }
    }

    fn loaded_state() -> AppState {
        AppState {
            puzzle: DataResource::Loaded(pikachu()),
            ..Default::default()
        }
    }

    fn tiny_artwork() -> Artwork {
        Artwork {
            width: 1,
            height: 1,
            pixels: vec![0xff0000ff],
        }
    }

    #[test]
    fn test_round_start_sets_loading_and_fetches() {
        let mut state = AppState::default().with_seed(7);
        state.guess_input = "leftover".into();

        let result = reducer(&mut state, Action::RoundStart);

        assert!(result.changed);
        assert!(state.puzzle.is_loading());
        assert!(state.artwork.is_empty());
        assert!(state.guess_input.is_empty());
        assert_eq!(result.effects.len(), 1);
        let Effect::FetchPuzzle { id } = result.effects[0] else {
            panic!("expected FetchPuzzle, got {:?}", result.effects[0]);
        };
        assert!((1..=1025).contains(&id));
    }

    #[test]
    fn test_round_start_ignored_while_loading() {
        let mut state = AppState {
            puzzle: DataResource::Loading,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::RoundStart);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_round_start_draws_from_selected_generation() {
        let mut state =
            AppState::new(Score::default(), dex_pool(&[Generation::Gen2])).with_seed(99);
        for _ in 0..50 {
            state.puzzle = DataResource::Empty;
            let result = reducer(&mut state, Action::RoundStart);
            let Effect::FetchPuzzle { id } = result.effects[0] else {
                panic!("expected FetchPuzzle");
            };
            assert!((152..=251).contains(&id), "id {id} outside gen 2");
        }
    }

    #[test]
    fn test_round_start_with_empty_pool_fails() {
        let mut state = AppState::new(Score::default(), Vec::new());
        let result = reducer(&mut state, Action::RoundStart);
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.puzzle.is_failed());
    }

    #[test]
    fn test_round_did_load_requests_artwork() {
        let mut state = AppState {
            puzzle: DataResource::Loading,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::RoundDidLoad(pikachu()));

        assert!(result.changed);
        assert_eq!(state.current_puzzle(), Some(&pikachu()));
        assert!(state.artwork.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchArtwork {
                id: 25,
                url: "https://example.test/25.png".into()
            }]
        );
    }

    #[test]
    fn test_round_did_load_without_sprite() {
        let mut state = AppState {
            puzzle: DataResource::Loading,
            ..Default::default()
        };
        let puzzle = Puzzle {
            image_url: None,
            ..pikachu()
        };

        let result = reducer(&mut state, Action::RoundDidLoad(puzzle));

        assert!(result.effects.is_empty());
        assert!(state.puzzle.is_loaded());
        assert!(state.artwork.is_failed());
        assert!(state.accepts_guess());
    }

    #[test]
    fn test_round_did_error_surfaces_failure() {
        let mut state = AppState {
            puzzle: DataResource::Loading,
            ..Default::default()
        };

        reducer(&mut state, Action::RoundDidError("timed out".into()));

        assert!(state.puzzle.is_failed());
        assert_eq!(state.puzzle.error(), Some("timed out"));

        // Retry
        let result = reducer(&mut state, Action::RoundStart);
        assert!(state.puzzle.is_loading());
        assert!(matches!(result.effects[0], Effect::FetchPuzzle { .. }));
    }

    #[test]
    fn test_late_results_are_dropped_when_not_loading() {
        let mut state = loaded_state();
        let result = reducer(
            &mut state,
            Action::RoundDidLoad(Puzzle {
                id: 1,
                name: "bulbasaur".into(),
                image_url: None,
            }),
        );
        assert!(!result.changed);
        assert_eq!(state.current_puzzle(), Some(&pikachu()));

        let result = reducer(&mut state, Action::RoundDidError("late".into()));
        assert!(!result.changed);
        assert!(state.puzzle.is_loaded());
    }

    #[test]
    fn test_correct_guess() {
        let mut state = loaded_state();
        state.guess_input = "Pikachu.".into();

        let result = reducer(&mut state, Action::GuessSubmit("Pikachu.".into()));

        assert!(result.changed);
        assert_eq!(state.guess, GuessResult::Correct);
        assert_eq!(state.score, Score::new(1, 0));
        assert_eq!(state.last_guess.as_deref(), Some("Pikachu."));
        assert!(state.guess_input.is_empty());
        assert_eq!(
            result.effects,
            vec![Effect::SaveScore {
                score: Score::new(1, 0)
            }]
        );
    }

    #[test]
    fn test_incorrect_guess() {
        let mut state = loaded_state();

        let result = reducer(&mut state, Action::GuessSubmit("raichu".into()));

        assert!(result.changed);
        assert_eq!(state.guess, GuessResult::Incorrect);
        assert_eq!(state.score, Score::new(0, 1));
        assert_eq!(
            result.effects,
            vec![Effect::SaveScore {
                score: Score::new(0, 1)
            }]
        );
    }

    #[test]
    fn test_empty_guess_is_noop() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::GuessSubmit(String::new()));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.guess, GuessResult::Unknown);
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn test_guess_rejected_while_loading() {
        let mut state = AppState {
            puzzle: DataResource::Loading,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::GuessSubmit("pikachu".into()));
        assert!(!result.changed);
        assert_eq!(state.guess, GuessResult::Unknown);
        assert_eq!(state.score.rounds(), 0);
    }

    #[test]
    fn test_second_guess_in_round_is_noop() {
        let mut state = loaded_state();
        reducer(&mut state, Action::GuessSubmit("raichu".into()));

        let result = reducer(&mut state, Action::GuessSubmit("pikachu".into()));

        assert!(!result.changed);
        assert_eq!(state.guess, GuessResult::Incorrect);
        assert_eq!(state.score, Score::new(0, 1));
        assert_eq!(state.last_guess.as_deref(), Some("raichu"));
    }

    #[test]
    fn test_input_frozen_once_resolved() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::GuessInputChange("pik".into()));
        assert!(result.changed);
        assert_eq!(state.guess_input, "pik");

        reducer(&mut state, Action::GuessSubmit("pikachu".into()));
        let result = reducer(&mut state, Action::GuessInputChange("x".into()));
        assert!(!result.changed);
        assert!(state.guess_input.is_empty());
    }

    #[test]
    fn test_advance_before_guess_is_noop() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::RoundAdvance);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.current_puzzle(), Some(&pikachu()));
    }

    #[test]
    fn test_advance_after_guess_starts_round() {
        let mut state = loaded_state();
        reducer(&mut state, Action::GuessSubmit("pikachu".into()));

        let result = reducer(&mut state, Action::RoundAdvance);

        assert!(result.changed);
        assert_eq!(state.guess, GuessResult::Unknown);
        assert_eq!(state.last_guess, None);
        assert!(state.puzzle.is_loading());
        assert!(matches!(result.effects[0], Effect::FetchPuzzle { .. }));
        // Score survives the round change
        assert_eq!(state.score, Score::new(1, 0));
    }

    #[test]
    fn test_score_reset() {
        let mut state = AppState {
            score: Score::new(12, 4),
            ..loaded_state()
        };

        let result = reducer(&mut state, Action::ScoreReset);

        assert!(result.changed);
        assert_eq!(state.score, Score::default());
        assert_eq!(
            result.effects,
            vec![Effect::SaveScore {
                score: Score::default()
            }]
        );

        // Resetting an empty score still persists it
        let result = reducer(&mut state, Action::ScoreReset);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn test_score_save_error_round_trip() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::ScoreDidSave).changed);

        reducer(&mut state, Action::ScoreDidError("disk full".into()));
        assert_eq!(state.save_error.as_deref(), Some("disk full"));

        assert!(reducer(&mut state, Action::ScoreDidSave).changed);
        assert_eq!(state.save_error, None);
    }

    #[test]
    fn test_stale_artwork_is_dropped() {
        let mut state = loaded_state();
        state.artwork = DataResource::Loading;

        let result = reducer(
            &mut state,
            Action::ArtworkDidLoad {
                id: 1,
                artwork: tiny_artwork(),
            },
        );
        assert!(!result.changed);
        assert!(state.artwork.is_loading());

        let result = reducer(
            &mut state,
            Action::ArtworkDidLoad {
                id: 25,
                artwork: tiny_artwork(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.artwork.data(), Some(&tiny_artwork()));
    }

    #[test]
    fn test_artwork_error_keeps_round_playable() {
        let mut state = loaded_state();
        state.artwork = DataResource::Loading;

        reducer(
            &mut state,
            Action::ArtworkDidError {
                id: 25,
                error: "404".into(),
            },
        );

        assert!(state.artwork.is_failed());
        assert!(state.accepts_guess());
    }

    #[test]
    fn test_tick_only_while_loading() {
        let mut state = loaded_state();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.puzzle = DataResource::Loading;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick_count, 1);
    }

    #[test]
    fn test_one_score_field_per_resolved_round() {
        let guesses = ["Pikachu", "raichu", "pika chu", "PIKACHU.", "pichu", "x"];
        let mut state = AppState::default().with_seed(3);
        for text in guesses {
            state.puzzle = DataResource::Loaded(pikachu());
            state.guess = GuessResult::Unknown;
            let before = state.score;

            reducer(&mut state, Action::GuessSubmit(text.into()));

            assert_eq!(state.score.rounds(), before.rounds() + 1);
            let won = state.score.wins - before.wins;
            let lost = state.score.losses - before.losses;
            assert_eq!(won + lost, 1);
            assert_eq!(won == 1, state.guess == GuessResult::Correct);
        }
        assert_eq!(state.score, Score::new(3, 3));
    }
}
