//! Text layout for text annotations.

pub mod layout;

pub use layout::{PositionedLine, PositionedLines, TextLayout};
