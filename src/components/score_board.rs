use ratatui::{
    layout::Alignment,
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::Score;

pub struct ScoreBoardProps<'a> {
    pub score: &'a Score,
    pub save_error: Option<&'a str>,
}

#[derive(Default)]
pub struct ScoreBoard;

impl Component<Action> for ScoreBoard {
    type Props<'a> = ScoreBoardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let label = Style::default().fg(Color::Gray);
        let value = Style::default().add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled("Wins: ", label),
            Span::styled(props.score.wins.to_string(), value.fg(Color::Green)),
            Span::raw("   "),
            Span::styled("Losses: ", label),
            Span::styled(props.score.losses.to_string(), value.fg(Color::Red)),
        ];
        if let Some(error) = props.save_error {
            spans.push(Span::styled(
                format!("   score not saved: {error}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }
}
