//! Color constants for the terminal console.

use crossterm::style::Color;

use crate::console::io::Tone;

/// View titles
pub const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };
/// Validation failures and rejected transitions
pub const DARK_RED: Color = Color::Rgb { r: 190, g: 30, b: 30 };
/// Confirmations after a successful save
pub const DARK_GREEN: Color = Color::Rgb { r: 40, g: 160, b: 40 };

// Plain text keeps the terminal's own foreground.

pub fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Heading => Some(GOLD),
        Tone::Error => Some(DARK_RED),
        Tone::Notice => Some(DARK_GREEN),
    }
}
