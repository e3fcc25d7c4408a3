pub mod backdrop;
pub mod card_art;
pub mod card_popup;
pub mod particles;
pub mod spread;
pub mod theme;

pub use theme::Theme;
