pub mod card;
pub mod config;
pub mod content;
pub mod error;
pub mod interpretation;
pub mod loader;
pub mod particles;
pub mod popup;

pub use card::{CardReferenceEntry, DisplayedCard, Orientation, ReferenceDeck};
pub use config::PopupConfig;
pub use content::{AssetPaths, CardContent, FsProbe, ImageProbe, ResolvedImage};
pub use error::PopupError;
pub use interpretation::interpretation;
pub use loader::{JsonFileSource, LoadStatus, ReferenceLoader, ReferenceSource};
pub use particles::{Particle, ParticleColor, ParticleField, Point, PARTICLE_COUNT};
pub use popup::{Appearance, CardPopup, PopupState};
