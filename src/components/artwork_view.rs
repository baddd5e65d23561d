use ratatui::{
    buffer::Buffer,
    prelude::{Frame, Rect},
    style::Color,
    widgets::Widget,
};

use super::Component;
use crate::action::Action;
use crate::artwork::Artwork;

/// Fill colour for every opaque pixel while the guess is unresolved
pub const SILHOUETTE: Color = Color::Rgb(22, 24, 34);

const UPPER_HALF: &str = "\u{2580}";
const LOWER_HALF: &str = "\u{2584}";

/// Largest size (cells wide, pixel rows tall) that fits the sprite in
/// `max_cols` x `max_rows` cells. Each cell holds two pixel rows.
pub fn fit_size(src_w: u32, src_h: u32, max_cols: u16, max_rows: u16) -> Option<(u16, u16)> {
    if src_w == 0 || src_h == 0 || max_cols == 0 || max_rows == 0 {
        return None;
    }
    let max_w = u32::from(max_cols);
    let max_h = u32::from(max_rows) * 2;
    let (w, h) = if max_w * src_h <= max_h * src_w {
        (max_w, (src_h * max_w / src_w).max(1))
    } else {
        ((src_w * max_h / src_h).max(1), max_h)
    };
    Some((u16::try_from(w).ok()?, u16::try_from(h).ok()?))
}

/// Half-block rendering of an [`Artwork`], centred in its area.
pub struct ArtworkCanvas<'a> {
    pub artwork: &'a Artwork,
    pub silhouette: bool,
}

impl ArtworkCanvas<'_> {
    fn sample(&self, dx: u16, dy: u16, dst_w: u16, dst_h: u16) -> Option<Color> {
        let sx = u32::from(dx) * self.artwork.width / u32::from(dst_w);
        let sy = u32::from(dy) * self.artwork.height / u32::from(dst_h);
        let (r, g, b) = self.artwork.opaque_rgb(sx, sy)?;
        if self.silhouette {
            Some(SILHOUETTE)
        } else {
            Some(Color::Rgb(r, g, b))
        }
    }
}

impl Widget for ArtworkCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((cols, px_rows)) =
            fit_size(self.artwork.width, self.artwork.height, area.width, area.height)
        else {
            return;
        };
        let rows = px_rows.div_ceil(2);
        let x0 = area.x + (area.width - cols) / 2;
        let y0 = area.y + (area.height - rows) / 2;

        for cy in 0..rows {
            for cx in 0..cols {
                let top = self.sample(cx, cy * 2, cols, px_rows);
                let bottom = if cy * 2 + 1 < px_rows {
                    self.sample(cx, cy * 2 + 1, cols, px_rows)
                } else {
                    None
                };
                let Some(cell) = buf.cell_mut((x0 + cx, y0 + cy)) else {
                    continue;
                };
                match (top, bottom) {
                    (None, None) => {}
                    (Some(top), None) => {
                        cell.set_symbol(UPPER_HALF).set_fg(top);
                    }
                    (None, Some(bottom)) => {
                        cell.set_symbol(LOWER_HALF).set_fg(bottom);
                    }
                    (Some(top), Some(bottom)) => {
                        cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
                    }
                }
            }
        }
    }
}

pub struct ArtworkViewProps<'a> {
    pub artwork: &'a Artwork,
    pub silhouette: bool,
}

#[derive(Default)]
pub struct ArtworkView;

impl Component<Action> for ArtworkView {
    type Props<'a> = ArtworkViewProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        frame.render_widget(
            ArtworkCanvas {
                artwork: props.artwork,
                silhouette: props.silhouette,
            },
            area,
        );
    }
}
