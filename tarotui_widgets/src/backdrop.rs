use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::theme::{blend, Theme};

/// Darkens whatever is already in the buffer, like a translucent black sheet
/// laid over the table while the popup is up.
pub struct BackdropWidget {
    /// 0.0 leaves cells untouched, 1.0 paints them fully black
    pub dim: f32,
}

impl BackdropWidget {
    pub fn new(dim: f32) -> Self {
        Self { dim }
    }
}

impl Default for BackdropWidget {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Widget for BackdropWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.dim <= 0.0 {
            return;
        }

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    let fg = darken(cell.fg, self.dim);
                    let bg = darken(cell.bg, self.dim);
                    cell.set_fg(fg);
                    cell.set_bg(bg);
                }
            }
        }
    }
}

fn darken(color: Color, dim: f32) -> Color {
    match color {
        Color::Rgb(..) => blend(color, Theme::BACKDROP, dim),
        // Terminal defaults have no known value; pin them to the dimmed felt
        _ => blend(Theme::FELT, Theme::BACKDROP, dim),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_dims_existing_cells() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "ab", ratatui::style::Style::default().fg(Color::Rgb(200, 200, 200)));
        if let Some(cell) = buf.cell_mut((0, 0)) {
            cell.set_bg(Color::Rgb(100, 50, 0));
        }

        BackdropWidget::default().render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "a");
        assert_eq!(cell.fg, Color::Rgb(40, 40, 40));
        assert_eq!(cell.bg, Color::Rgb(20, 10, 0));
    }

    #[test]
    fn test_zero_dim_is_noop() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        BackdropWidget::new(0.0).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
    }
}
