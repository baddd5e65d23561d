use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection,
    StatusBarStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::{ArtworkView, ArtworkViewProps, Component, ScoreBoard, ScoreBoardProps};
use crate::action::Action;
use crate::state::{AppState, GuessResult, LOADING_DOT_CYCLE};

pub const TITLE: &str = "Who's that Pok\u{e9}mon?";

const STAGE_BG: Color = Color::Rgb(236, 228, 196);
const STAGE_TEXT: Color = Color::Rgb(60, 60, 72);
const INPUT_BG: Color = Color::Rgb(40, 42, 54);
const TEXT_DIM: Color = Color::Rgb(150, 150, 160);
const ACCENT_GREEN: Color = Color::Rgb(104, 204, 120);
const ACCENT_RED: Color = Color::Rgb(214, 92, 92);

pub struct GameScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole game: stage, verdict, guess field, score and hints
pub struct GameScreen {
    input: TextInput,
    artwork: ArtworkView,
    score_board: ScoreBoard,
    status_bar: StatusBar,
}

impl Default for GameScreen {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            artwork: ArtworkView,
            score_board: ScoreBoard,
            status_bar: StatusBar::new(),
        }
    }
}

impl GameScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for GameScreen {
    type Props<'a> = GameScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        let state = props.state;

        match key.code {
            KeyCode::Esc => return vec![Action::Quit],
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return vec![Action::ScoreReset];
            }
            _ => {}
        }

        if state.puzzle.is_failed() || state.puzzle.is_empty() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('r') => vec![Action::RoundStart],
                _ => Vec::new(),
            };
        }

        if state.guess.is_resolved() {
            return match key.code {
                KeyCode::Enter => vec![Action::RoundAdvance],
                _ => Vec::new(),
            };
        }

        if key.code == KeyCode::Enter {
            return vec![Action::GuessSubmit(state.guess_input.clone())];
        }

        let input_props = TextInputProps {
            value: &state.guess_input,
            placeholder: "Type your guess...",
            is_focused: true,
            style: input_style(),
            on_change: Action::GuessInputChange,
            on_submit: Action::GuessSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Min(8),    // Game panel
            Constraint::Length(1), // Score
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let panel = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {TITLE} "))
            .title_alignment(Alignment::Center);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel, chunks[0]);

        let rows = Layout::vertical([
            Constraint::Min(4),    // Stage
            Constraint::Length(1), // Verdict
            Constraint::Length(1), // Reveal
            Constraint::Length(1), // Input
        ])
        .split(inner);

        self.render_stage(frame, rows[0], state);
        render_verdict(frame, rows[1], rows[2], state);

        let resolved = state.guess.is_resolved();
        let input_props = TextInputProps {
            value: &state.guess_input,
            placeholder: if resolved {
                "Press Enter to play again"
            } else {
                "Type your guess..."
            },
            is_focused: props.is_focused && state.accepts_guess(),
            style: input_style(),
            on_change: Action::GuessInputChange,
            on_submit: Action::GuessSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, rows[3], input_props);

        self.score_board.render(
            frame,
            chunks[1],
            ScoreBoardProps {
                score: &state.score,
                save_error: state.save_error.as_deref(),
            },
        );

        let hints = status_hints(state);
        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

impl GameScreen {
    fn render_stage(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Block::default().style(Style::default().bg(STAGE_BG)), area);
        let text_style = Style::default().fg(STAGE_TEXT).bg(STAGE_BG);

        if state.puzzle.is_loading() {
            render_stage_message(frame, area, vec![loading_line(state.tick_count)], text_style);
            return;
        }
        if let Some(error) = state.puzzle.error() {
            let lines = vec![
                Line::from("Couldn't fetch a Pok\u{e9}mon"),
                Line::from(Span::styled(error.to_string(), Style::default().fg(ACCENT_RED))),
                Line::from("Press r to retry"),
            ];
            render_stage_message(frame, area, lines, text_style);
            return;
        }
        if state.puzzle.is_empty() {
            render_stage_message(frame, area, vec![Line::from("Press Enter to start")], text_style);
            return;
        }

        if let Some(artwork) = state.artwork.data() {
            self.artwork.render(
                frame,
                area,
                ArtworkViewProps {
                    artwork,
                    silhouette: !state.guess.is_resolved(),
                },
            );
        } else if state.artwork.is_loading() {
            render_stage_message(frame, area, vec![loading_line(state.tick_count)], text_style);
        } else if state.artwork.is_failed() {
            render_stage_message(frame, area, vec![Line::from("No sprite for this one")], text_style);
        }
    }
}

fn render_stage_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, style: Style) {
    let height = lines.len() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(
        Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

fn loading_line(tick_count: u32) -> Line<'static> {
    let dots = (tick_count % LOADING_DOT_CYCLE) as usize;
    Line::from(format!("Loading{:<3}", ".".repeat(dots)))
}

fn render_verdict(frame: &mut Frame, verdict_area: Rect, reveal_area: Rect, state: &AppState) {
    let Some(puzzle) = state.current_puzzle() else {
        return;
    };
    let bold = Modifier::BOLD;
    let (verdict, reveal) = match state.guess {
        GuessResult::Unknown => return,
        GuessResult::Correct => (
            Span::styled("Correct!", Style::default().fg(ACCENT_GREEN).add_modifier(bold)),
            format!("It's {}!", puzzle.display_name()),
        ),
        GuessResult::Incorrect => (
            Span::styled("Incorrect", Style::default().fg(ACCENT_RED).add_modifier(bold)),
            format!("The Pok\u{e9}mon was {}!", puzzle.display_name()),
        ),
    };
    frame.render_widget(
        Paragraph::new(Line::from(verdict)).alignment(Alignment::Center),
        verdict_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(reveal)).alignment(Alignment::Center),
        reveal_area,
    );
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    let mut hints = Vec::new();
    if state.puzzle.is_failed() {
        hints.push(StatusBarHint::new("r", "retry"));
    } else if state.guess.is_resolved() {
        hints.push(StatusBarHint::new("enter", "play again"));
    } else {
        hints.push(StatusBarHint::new("enter", "guess"));
    }
    hints.push(StatusBarHint::new("ctrl+r", "reset score"));
    hints.push(StatusBarHint::new("esc", "quit"));
    hints
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::new(1, 0, 1, 0),
            bg: Some(INPUT_BG),
            fg: None,
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}
