pub mod artwork_view;
pub mod game_screen;
pub mod score_board;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use artwork_view::{fit_size, ArtworkCanvas, ArtworkView, ArtworkViewProps, SILHOUETTE};
pub use game_screen::{GameScreen, GameScreenProps, TITLE};
pub use score_board::{ScoreBoard, ScoreBoardProps};
