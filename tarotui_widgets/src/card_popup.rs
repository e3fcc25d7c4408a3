use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap};

use tarotui_core::{Appearance, CardContent, Point};

use crate::card_art::{CardArtWidget, ART_HEIGHT, ART_WIDTH};
use crate::particles::cell_to_px;
use crate::theme::{blend, Theme};

/// Full-size popup, before scaling and clamping to the screen
pub const POPUP_WIDTH: u16 = 76;
pub const POPUP_HEIGHT: u16 = 22;
const INTERPRETATION_HEIGHT: u16 = 4;

/// Where a click landed relative to the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupHit {
    CloseButton,
    Popup,
    /// Inside the overlay but outside the popup box
    Overlay,
    Outside,
}

/// Geometry of the popup for one frame. Computed once and shared between
/// rendering, hit-testing and the particle anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupLayout {
    pub overlay: Rect,
    pub popup: Rect,
    pub close_button: Rect,
    pub art: Rect,
    pub info: Rect,
}

impl PopupLayout {
    pub fn new(overlay: Rect, scale: f32) -> Self {
        let full_w = POPUP_WIDTH.min(overlay.width - overlay.width / 10);
        let full_h = POPUP_HEIGHT.min(overlay.height - overlay.height / 10);
        let scale = scale.clamp(0.0, 1.0);
        let width = (full_w as f32 * scale).round() as u16;
        let height = (full_h as f32 * scale).round() as u16;
        let popup = centered_rect(width, height, overlay);

        let close_button = if popup.width >= 8 {
            Rect::new(popup.right() - 5, popup.y, 3, 1)
        } else {
            Rect::default()
        };

        let inner = Rect::new(
            popup.x.saturating_add(2),
            popup.y.saturating_add(1),
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(2),
        );
        let [art, info] =
            Layout::horizontal([Constraint::Length(ART_WIDTH + 2), Constraint::Min(0)])
                .areas(inner);

        Self {
            overlay,
            popup,
            close_button,
            art,
            info,
        }
    }

    /// Centre of the popup box in particle (pixel) space
    pub fn center_px(&self) -> Point {
        cell_to_px(
            self.popup.x as f32 + self.popup.width as f32 / 2.0,
            self.popup.y as f32 + self.popup.height as f32 / 2.0,
        )
    }

    pub fn hit(&self, column: u16, row: u16) -> PopupHit {
        if contains(self.close_button, column, row) {
            PopupHit::CloseButton
        } else if contains(self.popup, column, row) {
            PopupHit::Popup
        } else if contains(self.overlay, column, row) {
            PopupHit::Overlay
        } else {
            PopupHit::Outside
        }
    }

    /// Hit-test a mouse event; only left-button presses count as clicks
    pub fn click(&self, mouse: MouseEvent) -> Option<PopupHit> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(self.hit(mouse.column, mouse.row)),
            _ => None,
        }
    }
}

/// The card popup: card art on the left, details and readings on the right
pub struct CardPopupWidget<'a> {
    pub content: &'a CardContent,
    pub appearance: Appearance,
}

impl<'a> CardPopupWidget<'a> {
    pub fn new(content: &'a CardContent, appearance: Appearance) -> Self {
        Self {
            content,
            appearance,
        }
    }

    fn fade(&self, color: Color) -> Color {
        blend(Theme::BACKDROP, color, self.appearance.opacity)
    }

    fn info_lines(&self) -> Vec<Line<'a>> {
        let content = self.content;
        let label = Style::default().fg(self.fade(Theme::LABEL_TEXT));
        let heading = Style::default()
            .fg(self.fade(Theme::GOLD))
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(content.title.clone(), heading)),
            Line::from(""),
        ];

        for (name, value) in content.detail_rows() {
            let value_color = if name == "状态" {
                Theme::orientation(content.orientation.is_reversed())
            } else {
                Theme::BRIGHT_TEXT
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", name), label),
                Span::styled(
                    value,
                    Style::default()
                        .fg(self.fade(value_color))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("含义:", heading)));
        lines.push(Line::from(Span::styled(
            content.meaning.clone(),
            Style::default().fg(self.fade(Theme::BODY_TEXT)),
        )));
        lines
    }
}

impl<'a> Widget for CardPopupWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.appearance.opacity <= 0.05 {
            return;
        }
        let layout = PopupLayout::new(area, self.appearance.scale);
        let popup = layout.popup;
        if popup.width < 24 || popup.height < 8 {
            return;
        }

        Clear.render(popup, buf);

        // Vertical gradient panel
        for y in popup.top()..popup.bottom() {
            let t = (y - popup.y) as f32 / popup.height.max(1) as f32;
            let bg = self.fade(blend(Theme::PANEL_TOP, Theme::PANEL_BOTTOM, t));
            for x in popup.left()..popup.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg);
                }
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.fade(Theme::GOLD)));
        block.render(popup, buf);

        if layout.close_button.width > 0 {
            buf.set_string(
                layout.close_button.x,
                layout.close_button.y,
                " \u{00d7} ", // ×
                Style::default()
                    .fg(Theme::CLOSE_BUTTON_FG)
                    .bg(self.fade(Theme::GOLD))
                    .add_modifier(Modifier::BOLD),
            );
        }

        if layout.art.height >= ART_HEIGHT {
            CardArtWidget::new(self.content)
                .opacity(self.appearance.opacity)
                .render(layout.art, buf);
        }

        let [details, note] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(INTERPRETATION_HEIGHT),
        ])
        .areas(layout.info);

        Paragraph::new(self.info_lines())
            .wrap(Wrap { trim: true })
            .render(details, buf);

        let note_block = Block::default()
            .borders(Borders::LEFT)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(self.fade(Theme::GOLD)))
            .style(Style::default().bg(self.fade(Theme::NOTE_BG)))
            .padding(Padding::new(1, 1, 1, 0));
        Paragraph::new(Line::from(Span::styled(
            self.content.interpretation,
            Style::default()
                .fg(self.fade(Theme::LABEL_TEXT))
                .add_modifier(Modifier::ITALIC),
        )))
        .wrap(Wrap { trim: true })
        .block(note_block)
        .render(note, buf);
    }
}

/// A `width` × `height` rect centred in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;
    use tarotui_core::{AssetPaths, DisplayedCard, ImageProbe, ReferenceDeck};
    use tarotui_core::CardReferenceEntry;

    struct AllImages;

    impl ImageProbe for AllImages {
        fn can_load(&self, _path: &std::path::Path) -> bool {
            true
        }
    }

    fn resolve(card: DisplayedCard) -> CardContent {
        let deck = ReferenceDeck::new(vec![CardReferenceEntry::new(
            "The Fool",
            "0",
            "Major Arcana",
            "m00.jpg",
        )]);
        let assets = AssetPaths::new(PathBuf::from("cards"), PathBuf::from("cards/m00.jpg"));
        CardContent::resolve(&card, Some(&deck), &assets, &AllImages)
    }

    fn render(content: &CardContent, appearance: Appearance) -> Buffer {
        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        CardPopupWidget::new(content, appearance).render(area, &mut buf);
        buf
    }

    /// Row text with padding cells (including those after wide glyphs) removed
    fn squashed(buf: &Buffer) -> Vec<String> {
        (buf.area.top()..buf.area.bottom())
            .map(|y| {
                (buf.area.left()..buf.area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .replace(' ', "")
            })
            .collect()
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (buf.area.top()..buf.area.bottom())
            .map(|y| {
                (buf.area.left()..buf.area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_known_card_shows_reference_details() {
        let content = resolve(DisplayedCard::new("The Fool", false).meanings("A fresh start", "Folly"));
        let buf = render(&content, Appearance::SHOWN);
        let rows = rows(&buf);
        let squashed = squashed(&buf);

        assert!(rows.iter().any(|r| r.contains("The Fool")));
        assert!(rows.iter().any(|r| r.contains("Major Arcana")));
        assert!(squashed.iter().any(|r| r.contains("编号:0")));
        assert!(squashed.iter().any(|r| r.contains("状态:正位")));
        assert!(rows.iter().any(|r| r.contains("A fresh start")));
        assert!(squashed
            .iter()
            .any(|r| r.contains("勇敢踏上新的旅程，相信直觉的指引。")));
    }

    #[test]
    fn test_unknown_card_omits_details() {
        let content = resolve(DisplayedCard::new("Custom Card", true));
        let buf = render(&content, Appearance::SHOWN);
        let squashed = squashed(&buf);

        assert!(!squashed.iter().any(|r| r.contains("编号")));
        assert!(!squashed.iter().any(|r| r.contains("类型")));
        assert!(!squashed.iter().any(|r| r.contains("花色")));
        assert!(squashed.iter().any(|r| r.contains("状态:逆位")));
        assert!(squashed.iter().any(|r| r.contains("逆位提示需要反思和调整。")));
    }

    #[test]
    fn test_transparent_popup_draws_nothing() {
        let content = resolve(DisplayedCard::new("The Fool", false));
        let buf = render(&content, Appearance::HIDDEN);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 120, 30)));
    }

    #[test]
    fn test_layout_scales_around_center() {
        let area = Rect::new(0, 0, 120, 30);
        let full = PopupLayout::new(area, 1.0);
        let small = PopupLayout::new(area, 0.8);
        assert_eq!(full.popup.width, POPUP_WIDTH);
        assert!(small.popup.width < full.popup.width);
        assert!(small.popup.height < full.popup.height);
        assert_eq!(full.center_px(), cell_to_px(60.0, 15.0));
    }

    #[test]
    fn test_layout_on_huge_screen_keeps_full_size() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 10_000,
            height: 9_000,
        };
        let layout = PopupLayout::new(area, 1.0);
        assert_eq!(layout.popup.width, POPUP_WIDTH);
        assert_eq!(layout.popup.height, POPUP_HEIGHT);

        // Small screens still get 90 % of each side
        let small = PopupLayout::new(Rect::new(0, 0, 40, 20), 1.0);
        assert_eq!(small.popup.width, 36);
        assert_eq!(small.popup.height, 18);
    }

    #[test]
    fn test_hit_regions() {
        let layout = PopupLayout::new(Rect::new(0, 0, 120, 30), 1.0);
        let close = layout.close_button;
        assert_eq!(layout.hit(close.x + 1, close.y), PopupHit::CloseButton);
        assert_eq!(
            layout.hit(layout.popup.x + 3, layout.popup.y + 3),
            PopupHit::Popup
        );
        assert_eq!(layout.hit(0, 0), PopupHit::Overlay);
        assert_eq!(layout.hit(200, 0), PopupHit::Outside);

        let click = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            layout.click(click(MouseEventKind::Down(MouseButton::Left))),
            Some(PopupHit::Overlay)
        );
        assert_eq!(layout.click(click(MouseEventKind::Moved)), None);
    }
}
