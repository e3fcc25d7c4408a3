use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use tarotui_core::{ParticleField, Point};

use crate::theme::{blend, Theme};

/// Pixels covered by one terminal column / row
pub const CELL_PX_WIDTH: f32 = 8.0;
pub const CELL_PX_HEIGHT: f32 = 16.0;

/// Top-left corner of cell (col, row) in pixel space
pub fn cell_to_px(col: f32, row: f32) -> Point {
    Point::new(col * CELL_PX_WIDTH, row * CELL_PX_HEIGHT)
}

/// The cell containing a pixel position, if it is on the grid at all
pub fn px_to_cell(point: Point) -> Option<(u16, u16)> {
    let col = (point.x / CELL_PX_WIDTH).floor();
    let row = (point.y / CELL_PX_HEIGHT).floor();
    if col < 0.0 || row < 0.0 || col > u16::MAX as f32 || row > u16::MAX as f32 {
        return None;
    }
    Some((col as u16, row as u16))
}

/// Draws every live particle of a field as a glowing dot
pub struct ParticleLayer<'a> {
    pub field: &'a ParticleField,
}

impl<'a> ParticleLayer<'a> {
    pub fn new(field: &'a ParticleField) -> Self {
        Self { field }
    }
}

impl<'a> Widget for ParticleLayer<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for particle in self.field.particles() {
            if particle.opacity <= 0.0 {
                continue;
            }
            let Some((x, y)) = px_to_cell(particle.position) else {
                continue;
            };
            if x < area.left() || x >= area.right() || y < area.top() || y >= area.bottom() {
                continue;
            }

            let symbol = if particle.scale < 1.25 {
                "\u{2022}" // •
            } else {
                "\u{25cf}" // ●
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                let under = cell.bg;
                let fg = blend(under, Theme::particle(particle.fill), particle.opacity);
                let glow = blend(under, Theme::particle(particle.glow), particle.opacity * 0.35);
                cell.set_symbol(symbol);
                cell.set_fg(fg);
                cell.set_bg(glow);
            }
        }
    }
}
