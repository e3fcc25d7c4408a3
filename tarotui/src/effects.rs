use ratatui::layout::Rect;
use ratatui::style::Color;
use tachyonfx::fx;
use tachyonfx::{Effect, EffectManager, Interpolation, Motion};

/// Our keyed effect manager using tachyonfx's built-in EffectManager
pub type FxManager = EffectManager<&'static str>;

const FELT: Color = Color::Rgb(24, 20, 44);

/// Popup materializes over the same 300ms as its scale-in
pub fn popup_open(area: Rect) -> Effect {
    fx::coalesce((300, Interpolation::CubicOut)).with_area(area)
}

/// Effect for a popup visibility change. Closing has none of its own; the
/// exit is the popup's fade-out plus the particle burst.
pub fn popup_transition(visible: bool, area: Rect) -> Option<Effect> {
    visible.then(|| popup_open(area))
}

/// Fresh spread sweeps across the table left to right, like cards laid down
pub fn deal_slide(area: Rect) -> Effect {
    fx::slide_in(Motion::LeftToRight, 6, 2, FELT, (450, Interpolation::QuadOut)).with_area(area)
}

/// Slow candle-like flicker on the table heading
pub fn title_shimmer(area: Rect) -> Effect {
    let shift = fx::hsl_shift_fg([8.0, 0.0, 0.18], (2000, Interpolation::SineInOut));
    fx::repeating(fx::ping_pong(shift)).with_area(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_opening_gets_an_effect() {
        let area = Rect::new(10, 5, 60, 20);
        assert!(popup_transition(true, area).is_some());
        assert!(popup_transition(false, area).is_none());
    }
}
