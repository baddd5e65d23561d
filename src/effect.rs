//! Effects - side effects declared by the reducer

use crate::state::Score;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the creature with this dex number
    FetchPuzzle { id: u16 },
    /// Fetch and decode the sprite for puzzle `id`
    FetchArtwork { id: u16, url: String },
    /// Persist the score
    SaveScore { score: Score },
}
