use rand::seq::SliceRandom;
use rand::Rng;

use tarotui_core::{CardReferenceEntry, DisplayedCard, ReferenceDeck};

pub const SPREAD_SIZE: usize = 5;

/// Dealt from when the reference deck failed to load
pub const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

/// The cards lying on the table and which of them have been turned over
pub struct ReadingTable {
    pub cards: Vec<DisplayedCard>,
    pub revealed: Vec<bool>,
    pub cursor: usize,
}

impl ReadingTable {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            revealed: Vec::new(),
            cursor: 0,
        }
    }

    pub fn is_dealt(&self) -> bool {
        !self.cards.is_empty()
    }

    /// Deal a fresh spread, from the reference deck when there is one
    pub fn deal<R: Rng>(&mut self, deck: Option<&ReferenceDeck>, rng: &mut R) {
        self.cards = match deck.filter(|d| !d.is_empty()) {
            Some(deck) => deck
                .cards
                .choose_multiple(&mut *rng, SPREAD_SIZE)
                .map(|entry| from_entry(entry, rng.gen_bool(0.5)))
                .collect(),
            None => MAJOR_ARCANA
                .choose_multiple(&mut *rng, SPREAD_SIZE)
                .map(|name| DisplayedCard::new(*name, rng.gen_bool(0.5)))
                .collect(),
        };
        self.revealed = vec![false; self.cards.len()];
        self.cursor = 0;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.cards.len() {
            self.cursor += 1;
        }
    }

    /// Turn the card at `index` face up and hand it back for display
    pub fn reveal(&mut self, index: usize) -> Option<DisplayedCard> {
        let card = self.cards.get(index)?.clone();
        self.revealed[index] = true;
        self.cursor = index;
        Some(card)
    }
}

fn from_entry(entry: &CardReferenceEntry, is_reversed: bool) -> DisplayedCard {
    let keywords = entry.keywords.join(", ");
    let up = entry.upright_reading().unwrap_or(&keywords);
    let rev = entry.reversed_reading().unwrap_or(&keywords);
    DisplayedCard::new(entry.name.clone(), is_reversed).meanings(up, rev)
}
