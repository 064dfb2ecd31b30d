//! Text measurement for the panel's fixed-cell font.

use inkcal_core::layout::TextMetrics;

/// Monospace approximation: every glyph occupies the same cell. Matches
/// the bitmap font the display side renders with; a real font measurer
/// can replace this behind the same trait.
pub struct MonoMetrics {
    pub char_width: u32,
    pub char_height: u32,
}

impl TextMetrics for MonoMetrics {
    fn measure(&self, text: &str) -> (u32, u32) {
        (
            text.chars().count() as u32 * self.char_width,
            self.char_height,
        )
    }
}
