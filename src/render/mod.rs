//! Deck rendering: theme resolution, auto-fit layout and PPTX output.
//!
//! The first record becomes a title slide; every other record becomes a
//! content slide with a sequence badge, a fitted body and, when an image is
//! available for its slide number, a picture beside a narrower text column.
mod renderer;

pub use renderer::{BODY_HEIGHT_IN, DeckRenderer, render, truncate_subtitle};
