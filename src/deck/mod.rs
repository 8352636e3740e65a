//! Slide decks, Edit Sets and the fractional-numbering merge.
mod edit;
mod merge;
mod slide;

pub use edit::EditSet;
pub use merge::merge;
pub use slide::{Deck, Position, SlidePreview, SlideRecord};
