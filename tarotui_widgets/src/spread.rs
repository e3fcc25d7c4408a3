use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use tarotui_core::DisplayedCard;

use crate::card_art::{CardSlotWidget, SLOT_HEIGHT, SLOT_WIDTH};

/// A row of dealt cards. The card under the cursor is lifted one row.
pub struct SpreadWidget<'a> {
    pub cards: &'a [DisplayedCard],
    pub revealed: &'a [bool],
    pub cursor: Option<usize>,
    pub spacing: u16,
}

impl<'a> SpreadWidget<'a> {
    pub fn new(cards: &'a [DisplayedCard], revealed: &'a [bool]) -> Self {
        Self {
            cards,
            revealed,
            cursor: None,
            spacing: 2,
        }
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn total_width(&self) -> u16 {
        let n = self.cards.len() as u16;
        if n == 0 {
            return 0;
        }
        n * SLOT_WIDTH + (n - 1) * self.spacing
    }

    /// Rect of card `index` within `area`, for rendering and hit-testing
    pub fn card_rect(&self, area: Rect, index: usize) -> Option<Rect> {
        if index >= self.cards.len() {
            return None;
        }
        let start_x = area.x + area.width.saturating_sub(self.total_width()) / 2;
        let x = start_x + index as u16 * (SLOT_WIDTH + self.spacing);
        let y = if self.cursor == Some(index) {
            area.y
        } else {
            area.y + 1
        };
        Some(Rect::new(x, y, SLOT_WIDTH, SLOT_HEIGHT))
    }
}

impl<'a> Widget for SpreadWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < SLOT_HEIGHT + 1 {
            return;
        }

        for (i, card) in self.cards.iter().enumerate() {
            let Some(card_area) = self.card_rect(area, i) else {
                continue;
            };
            if card_area.right() > area.right() || card_area.bottom() > area.bottom() {
                continue;
            }

            CardSlotWidget::new(&card.name)
                .reversed(card.is_reversed)
                .face_up(self.revealed.get(i).copied().unwrap_or(false))
                .highlighted(self.cursor == Some(i))
                .render(card_area, buf);
        }
    }
}
