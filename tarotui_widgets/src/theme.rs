use ratatui::style::Color;
use tarotui_core::ParticleColor;

/// Gold-on-midnight colour theme for the reading table
pub struct Theme;

impl Theme {
    // Backgrounds
    pub const BG: Color = Color::Rgb(13, 13, 24);
    pub const FELT: Color = Color::Rgb(24, 20, 44);
    pub const PANEL_TOP: Color = Color::Rgb(26, 26, 46);
    pub const PANEL_BOTTOM: Color = Color::Rgb(42, 42, 62);
    /// What the overlay dims towards
    pub const BACKDROP: Color = Color::Rgb(0, 0, 0);

    // Card colors
    pub const GOLD: Color = Color::Rgb(212, 175, 55);
    pub const CARD_BORDER: Color = Color::Rgb(108, 100, 125);
    pub const CARD_BACK: Color = Color::Rgb(60, 48, 110);
    pub const CARD_FACE_DIM: Color = Color::Rgb(80, 72, 100);

    // Orientation
    pub const UPRIGHT: Color = Color::Rgb(78, 205, 196);
    pub const REVERSED: Color = Color::Rgb(255, 107, 107);

    // Text
    pub const LABEL_TEXT: Color = Color::Rgb(170, 170, 170);
    pub const BODY_TEXT: Color = Color::Rgb(204, 204, 204);
    pub const BRIGHT_TEXT: Color = Color::Rgb(255, 255, 255);
    pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
    pub const CLOSE_BUTTON_FG: Color = Color::Rgb(0, 0, 0);
    /// Interpretation box tint
    pub const NOTE_BG: Color = Color::Rgb(44, 40, 40);

    pub fn orientation(reversed: bool) -> Color {
        if reversed {
            Self::REVERSED
        } else {
            Self::UPRIGHT
        }
    }

    pub fn particle(color: ParticleColor) -> Color {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    }
}

/// Linear blend between two RGB colours; non-RGB `from` is treated as the backdrop
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let from = match from {
        Color::Rgb(..) => from,
        _ => Theme::BACKDROP,
    };
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let r = (r1 as f32 + (r2 as f32 - r1 as f32) * t).round() as u8;
            let g = (g1 as f32 + (g2 as f32 - g1 as f32) * t).round() as u8;
            let b = (b1 as f32 + (b2 as f32 - b1 as f32) * t).round() as u8;
            Color::Rgb(r, g, b)
        }
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend(Color::Reset, b, 0.0), Theme::BACKDROP);
    }

    #[test]
    fn test_particle_palette_is_rgb() {
        assert_eq!(Theme::particle(ParticleColor::Gold), Theme::GOLD);
        for color in ParticleColor::ALL {
            assert!(matches!(Theme::particle(color), Color::Rgb(..)));
        }
    }
}
