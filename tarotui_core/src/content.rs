use std::path::{Path, PathBuf};

use tracing::debug;

use crate::card::{CardReferenceEntry, DisplayedCard, Orientation, ReferenceDeck};
use crate::interpretation::interpretation;

/// Answers whether an image can actually be shown
pub trait ImageProbe {
    fn can_load(&self, path: &Path) -> bool;
}

/// Treats any existing regular file as loadable
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl ImageProbe for FsProbe {
    fn can_load(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Where card images live and what to show when one is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub image_dir: PathBuf,
    pub default_image: PathBuf,
}

impl AssetPaths {
    pub fn new(image_dir: impl Into<PathBuf>, default_image: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            default_image: default_image.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Path picked from the reference entry, the card, or the default
    pub requested: PathBuf,
    /// Path actually shown after the load check
    pub path: PathBuf,
}

impl ResolvedImage {
    pub fn fell_back(&self) -> bool {
        self.requested != self.path
    }
}

/// Everything the popup shows for one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    pub title: String,
    pub number: Option<String>,
    pub arcana: Option<String>,
    pub suit: Option<String>,
    pub orientation: Orientation,
    pub meaning: String,
    pub interpretation: &'static str,
    pub image: ResolvedImage,
}

impl CardContent {
    pub fn resolve(
        card: &DisplayedCard,
        deck: Option<&ReferenceDeck>,
        assets: &AssetPaths,
        probe: &dyn ImageProbe,
    ) -> Self {
        let entry = deck.and_then(|deck| deck.find(&card.name));
        let image = resolve_image(card, entry, assets, probe);

        Self {
            title: card.name.clone(),
            number: entry.map(|e| e.number.clone()),
            arcana: entry.map(|e| e.arcana.clone()),
            suit: entry.and_then(|e| e.suit.clone()),
            orientation: card.orientation(),
            meaning: card.meaning().to_string(),
            interpretation: interpretation(&card.name, card.orientation()),
            image,
        }
    }

    /// Labelled rows in display order: number, type, suit, then orientation
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::with_capacity(4);
        if let Some(number) = &self.number {
            rows.push(("编号", number.clone()));
        }
        if let Some(arcana) = &self.arcana {
            rows.push(("类型", arcana.clone()));
        }
        if let Some(suit) = &self.suit {
            rows.push(("花色", suit.clone()));
        }
        rows.push(("状态", self.orientation.label().to_string()));
        rows
    }

    pub fn has_reference(&self) -> bool {
        self.number.is_some()
    }
}

fn resolve_image(
    card: &DisplayedCard,
    entry: Option<&CardReferenceEntry>,
    assets: &AssetPaths,
    probe: &dyn ImageProbe,
) -> ResolvedImage {
    let requested = match (entry, &card.image) {
        (Some(entry), _) => assets.image_dir.join(&entry.img),
        (None, Some(image)) => image.clone(),
        (None, None) => assets.default_image.clone(),
    };

    let path = if probe.can_load(&requested) {
        requested.clone()
    } else {
        debug!(card = %card.name, image = %requested.display(), "image missing, using default");
        assets.default_image.clone()
    };

    ResolvedImage { requested, path }
}
