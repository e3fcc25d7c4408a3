use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tachyonfx::Duration;
use tracing::debug;

use tarotui_core::{CardPopup, LoadStatus};
use tarotui_widgets::backdrop::BackdropWidget;
use tarotui_widgets::card_art::SLOT_HEIGHT;
use tarotui_widgets::card_popup::{CardPopupWidget, PopupHit, PopupLayout};
use tarotui_widgets::particles::ParticleLayer;
use tarotui_widgets::spread::SpreadWidget;
use tarotui_widgets::theme::Theme;

use crate::effects::{self, FxManager};
use crate::table::ReadingTable;

/// Main application state
pub struct App {
    pub popup: CardPopup,
    pub table: ReadingTable,
    pub tick: u64,
    pub fx: FxManager,
    area: Rect,
    spread_rects: Vec<Rect>,
    popup_layout: Option<PopupLayout>,
    was_visible: bool,
}

impl App {
    pub fn new(mut popup: CardPopup) -> Self {
        popup.preload();
        Self {
            popup,
            table: ReadingTable::new(),
            tick: 0,
            fx: FxManager::default(),
            area: Rect::default(),
            spread_rects: Vec::new(),
            popup_layout: None,
            was_visible: false,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let now = Instant::now();
        let area = frame.area();
        if self.area != area {
            self.area = area;
            self.fx
                .add_unique_effect("title_shimmer", effects::title_shimmer(title_area(area)));
        }

        frame.render_widget(Block::default().style(Style::default().bg(Theme::FELT)), area);

        let [_, table, help] = screen_areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "\u{2726} Tarot Reading \u{2726}",
                Style::default()
                    .fg(Theme::GOLD)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            title_area(area),
        );

        self.render_table(frame, table);
        self.render_help(frame, help);

        // Particles sit under the overlay, like the burst behind a fading popup
        frame.render_widget(ParticleLayer::new(self.popup.particles()), area);

        self.popup_layout = None;
        if self.popup.is_overlay_displayed() {
            frame.render_widget(BackdropWidget::default(), area);

            let appearance = self.popup.appearance(now);
            let layout = PopupLayout::new(area, appearance.scale);
            self.popup.set_anchor(layout.center_px());
            if let Some(content) = self.popup.content() {
                frame.render_widget(CardPopupWidget::new(content, appearance), area);
            }
            self.popup_layout = Some(layout);
        }

        // Apply all tachyonfx effects on top of rendered content
        let tick_duration = Duration::from_millis(33); // ~30fps
        let buf = frame.buffer_mut();
        self.fx.process_effects(tick_duration, buf, area);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        if !self.table.is_dealt() {
            let message = match self.popup.load_status() {
                LoadStatus::Unloaded | LoadStatus::Loading => "Shuffling the deck\u{2026}",
                LoadStatus::Loaded | LoadStatus::Failed => "",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Theme::DIM_TEXT)))
                    .alignment(Alignment::Center),
                centered_row(area),
            );
            return;
        }

        let spread = SpreadWidget::new(&self.table.cards, &self.table.revealed)
            .cursor(Some(self.table.cursor));
        let spread_area = centered_row_of(area, SLOT_HEIGHT + 1);

        // Store card rects for mouse hit-testing
        self.spread_rects = (0..self.table.cards.len())
            .map(|i| spread.card_rect(spread_area, i).unwrap_or_default())
            .collect();

        frame.render_widget(spread, spread_area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let key = Style::default().fg(Theme::GOLD);
        let dim = Style::default().fg(Theme::DIM_TEXT);
        let help = Paragraph::new(Line::from(vec![
            Span::styled("[", dim),
            Span::styled("\u{2190}\u{2192}", key),
            Span::styled("] Move  [", dim),
            Span::styled("Enter", key),
            Span::styled("] Reveal  [", dim),
            Span::styled("Esc", key),
            Span::styled("] Close  [", dim),
            Span::styled("R", key),
            Span::styled("] Deal again  [", dim),
            Span::styled("Q", key),
            Span::styled("] Quit", dim),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, area);
    }

    /// Handle key event. Returns true if should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let now = Instant::now();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Esc => {
                if self.popup.is_popup_visible() {
                    self.popup.hide(now);
                }
            }
            _ if self.popup.is_overlay_displayed() => {}
            KeyCode::Left | KeyCode::Char('h') => self.table.move_left(),
            KeyCode::Right | KeyCode::Char('l') => self.table.move_right(),
            KeyCode::Enter | KeyCode::Char(' ') => self.reveal(self.table.cursor, now),
            KeyCode::Char('r') | KeyCode::Char('R') => self.deal(),
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now = Instant::now();

        // The overlay swallows clicks while it is up
        if let Some(layout) = self.popup_layout {
            match layout.click(mouse) {
                Some(PopupHit::CloseButton) | Some(PopupHit::Overlay) => self.popup.hide(now),
                _ => {}
            }
            return;
        }

        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let hit = self.spread_rects.iter().position(|rect| {
                mouse.column >= rect.x
                    && mouse.column < rect.right()
                    && mouse.row >= rect.y
                    && mouse.row < rect.bottom()
            });
            if let Some(index) = hit {
                self.reveal(index, now);
            }
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.tick += 1;
        self.popup.tick(now);

        if !self.table.is_dealt() && self.popup.load_status().is_resolved() {
            self.deal();
        }

        // Detect visibility changes and trigger popup effects
        let visible = self.popup.is_popup_visible();
        if visible != self.was_visible {
            let popup_area = PopupLayout::new(self.area, 1.0).popup;
            if let Some(effect) = effects::popup_transition(visible, popup_area) {
                self.fx.add_unique_effect("popup", effect);
            }
            self.was_visible = visible;
        }
    }

    fn reveal(&mut self, index: usize, now: Instant) {
        if let Some(card) = self.table.reveal(index) {
            debug!(card = %card.name, index, "card revealed");
            self.popup.show(card, now);
        }
    }

    fn deal(&mut self) {
        let mut rng = rand::thread_rng();
        self.table.deal(self.popup.reference(), &mut rng);
        self.spread_rects.clear();
        let [_, table, _] = screen_areas(self.area);
        let spread_area = centered_row_of(table, SLOT_HEIGHT + 1);
        self.fx
            .add_unique_effect("deal", effects::deal_slide(spread_area));
    }
}

/// Title, table and help bands of the screen
fn screen_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(area)
}

fn title_area(area: Rect) -> Rect {
    let [title, _, _] = screen_areas(area);
    Rect::new(title.x, title.y + 1, title.width, 1.min(title.height))
}

fn centered_row(area: Rect) -> Rect {
    centered_row_of(area, 1)
}

fn centered_row_of(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect::new(area.x, area.y + (area.height - height) / 2, area.width, height)
}
