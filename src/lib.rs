//! Who's that Pokemon? - a silhouette guessing game for the terminal
//!
//! The library holds the game so it can be driven from tests; `main.rs`
//! wires it to the terminal, PokeAPI and the score file.

pub mod action;
pub mod api;
pub mod artwork;
pub mod components;
pub mod effect;
pub mod guess;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod store;
