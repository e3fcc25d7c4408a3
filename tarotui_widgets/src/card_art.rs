use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use tarotui_core::CardContent;

use crate::theme::{blend, Theme};

/// Size of the large card face shown inside the popup
pub const ART_WIDTH: u16 = 17;
pub const ART_HEIGHT: u16 = 13;

/// Size of a card lying on the reading table
pub const SLOT_WIDTH: u16 = 11;
pub const SLOT_HEIGHT: u16 = 8;

/// Terminal stand-in for the card artwork: a framed face showing the number,
/// the title and the image file that would be displayed. Reversed cards are
/// drawn upside down (number at the bottom, title at the top, ▼ marker).
pub struct CardArtWidget<'a> {
    pub content: &'a CardContent,
    pub opacity: f32,
}

impl<'a> CardArtWidget<'a> {
    pub fn new(content: &'a CardContent) -> Self {
        Self {
            content,
            opacity: 1.0,
        }
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    fn style(&self, color: Color) -> Style {
        Style::default().fg(blend(Theme::PANEL_TOP, color, self.opacity))
    }
}

impl<'a> Widget for CardArtWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < ART_WIDTH || area.height < ART_HEIGHT {
            return;
        }
        let x0 = area.x + (area.width - ART_WIDTH) / 2;
        let y0 = area.y + (area.height - ART_HEIGHT) / 2;
        let card = Rect::new(x0, y0, ART_WIDTH, ART_HEIGHT);

        draw_frame(card, buf, self.style(Theme::GOLD), self.style(Theme::CARD_FACE_DIM));

        let reversed = self.content.orientation.is_reversed();
        let inner_w = ART_WIDTH - 2;
        let top = card.y + 1;
        let bottom = card.bottom() - 2;

        let number = self.content.number.as_deref().unwrap_or("?");
        let number_style = self.style(Theme::GOLD).add_modifier(Modifier::BOLD);
        let title_style = self.style(Theme::BRIGHT_TEXT).add_modifier(Modifier::BOLD);
        let title_lines = wrap_words(&self.content.title, inner_w as usize - 2);

        let (number_y, title_y) = if reversed {
            (bottom, top + 1)
        } else {
            (top, bottom.saturating_sub(title_lines.len() as u16))
        };
        put_centered(buf, card.x + 1, number_y, inner_w, number, number_style);
        for (i, line) in title_lines.iter().enumerate() {
            put_centered(buf, card.x + 1, title_y + i as u16, inner_w, line, title_style);
        }

        let marker = if reversed { "\u{25bc}" } else { "\u{25b2}" }; // ▼ ▲
        let mid = card.y + ART_HEIGHT / 2;
        put_centered(
            buf,
            card.x + 1,
            mid - 1,
            inner_w,
            marker,
            self.style(Theme::orientation(reversed)),
        );

        let file = self
            .content
            .image
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = truncate(&file, inner_w as usize - 2);
        put_centered(buf, card.x + 1, mid + 1, inner_w, &file, self.style(Theme::DIM_TEXT));
    }
}

/// Small card on the table, face up or face down
pub struct CardSlotWidget<'a> {
    pub name: &'a str,
    pub reversed: bool,
    pub face_up: bool,
    pub highlighted: bool,
}

impl<'a> CardSlotWidget<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            reversed: false,
            face_up: false,
            highlighted: false,
        }
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn face_up(mut self, face_up: bool) -> Self {
        self.face_up = face_up;
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }
}

impl<'a> Widget for CardSlotWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < SLOT_WIDTH || area.height < SLOT_HEIGHT {
            return;
        }
        let card = Rect::new(area.x, area.y, SLOT_WIDTH, SLOT_HEIGHT);
        let border = if self.highlighted {
            Theme::GOLD
        } else {
            Theme::CARD_BORDER
        };
        let border_style = Style::default().fg(border);

        if !self.face_up {
            draw_frame(card, buf, border_style, Style::default().fg(Theme::CARD_BACK));
            return;
        }

        draw_frame(card, buf, border_style, Style::default().fg(Theme::FELT));
        let inner_w = SLOT_WIDTH - 2;
        let lines = wrap_words(self.name, inner_w as usize);
        let text_style = Style::default()
            .fg(Theme::BRIGHT_TEXT)
            .add_modifier(Modifier::BOLD);
        let start = card.y + 1;
        for (i, line) in lines.iter().take(SLOT_HEIGHT as usize - 3).enumerate() {
            put_centered(buf, card.x + 1, start + i as u16, inner_w, line, text_style);
        }
        let marker = if self.reversed { "\u{25bc}" } else { "\u{25b2}" };
        put_centered(
            buf,
            card.x + 1,
            card.bottom() - 2,
            inner_w,
            marker,
            Style::default().fg(Theme::orientation(self.reversed)),
        );
    }
}

fn draw_frame(card: Rect, buf: &mut Buffer, border: Style, fill: Style) {
    let right = card.right() - 1;
    let bottom = card.bottom() - 1;

    buf.set_string(card.x, card.y, "\u{256d}", border); // ╭
    buf.set_string(right, card.y, "\u{256e}", border); // ╮
    buf.set_string(card.x, bottom, "\u{2570}", border); // ╰
    buf.set_string(right, bottom, "\u{256f}", border); // ╯
    for x in card.x + 1..right {
        buf.set_string(x, card.y, "\u{2500}", border);
        buf.set_string(x, bottom, "\u{2500}", border);
    }

    for y in card.y + 1..bottom {
        buf.set_string(card.x, y, "\u{2502}", border);
        buf.set_string(right, y, "\u{2502}", border);
        for x in card.x + 1..right {
            let pattern = if (x + y) % 2 == 0 {
                "\u{2591}"
            } else {
                " "
            }; // ░
            buf.set_string(x, y, pattern, fill);
        }
    }
}

fn put_centered(buf: &mut Buffer, x: u16, y: u16, width: u16, text: &str, style: Style) {
    let len = text.chars().count() as u16;
    let cx = x + width.saturating_sub(len) / 2;
    buf.set_stringn(cx, y, text, width as usize, style);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}'); // …
    out
}

/// Greedy word wrap; words longer than `width` are cut
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate(word, width);
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
