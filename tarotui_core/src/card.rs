use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

/// Upright or reversed, as drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn from_reversed(is_reversed: bool) -> Self {
        if is_reversed {
            Orientation::Reversed
        } else {
            Orientation::Upright
        }
    }

    pub fn is_reversed(&self) -> bool {
        matches!(self, Orientation::Reversed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Upright => "正位",
            Orientation::Reversed => "逆位",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A card handed to the popup by the caller. Never stored past the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedCard {
    pub name: String,
    pub is_reversed: bool,
    pub image: Option<PathBuf>,
    pub meaning_up: String,
    pub meaning_rev: String,
}

impl DisplayedCard {
    pub fn new(name: impl Into<String>, is_reversed: bool) -> Self {
        Self {
            name: name.into(),
            is_reversed,
            image: None,
            meaning_up: String::new(),
            meaning_rev: String::new(),
        }
    }

    pub fn image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn meanings(mut self, up: impl Into<String>, rev: impl Into<String>) -> Self {
        self.meaning_up = up.into();
        self.meaning_rev = rev.into();
        self
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_reversed(self.is_reversed)
    }

    /// Meaning text for the way the card was drawn
    pub fn meaning(&self) -> &str {
        if self.is_reversed {
            &self.meaning_rev
        } else {
            &self.meaning_up
        }
    }
}

/// Light/shadow readings shipped with some reference datasets
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meanings {
    #[serde(default)]
    pub light: Vec<String>,
    #[serde(default)]
    pub shadow: Vec<String>,
}

/// One entry of the reference catalogue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardReferenceEntry {
    pub name: String,
    #[serde(deserialize_with = "number_as_text")]
    pub number: String,
    pub arcana: String,
    #[serde(default)]
    pub suit: Option<String>,
    pub img: String,
    #[serde(default)]
    pub meanings: Option<Meanings>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CardReferenceEntry {
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        arcana: impl Into<String>,
        img: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            arcana: arcana.into(),
            suit: None,
            img: img.into(),
            meanings: None,
            keywords: Vec::new(),
        }
    }

    pub fn suit(mut self, suit: impl Into<String>) -> Self {
        self.suit = Some(suit.into());
        self
    }

    /// First light reading, if the dataset has one
    pub fn upright_reading(&self) -> Option<&str> {
        self.meanings
            .as_ref()
            .and_then(|m| m.light.first())
            .map(String::as_str)
    }

    /// First shadow reading, if the dataset has one
    pub fn reversed_reading(&self) -> Option<&str> {
        self.meanings
            .as_ref()
            .and_then(|m| m.shadow.first())
            .map(String::as_str)
    }
}

/// Some catalogues store `number` as "0", others as 0
fn number_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Text(String),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Int(n) => n.to_string(),
        Number::Text(s) => s,
    })
}

/// The reference catalogue: a JSON document with a top-level `cards` list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReferenceDeck {
    pub cards: Vec<CardReferenceEntry>,
}

impl ReferenceDeck {
    pub fn new(cards: Vec<CardReferenceEntry>) -> Self {
        Self { cards }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Exact name match, first entry wins
    pub fn find(&self, name: &str) -> Option<&CardReferenceEntry> {
        self.cards.iter().find(|card| card.name == name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
