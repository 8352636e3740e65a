//! PowerPoint (.pptx) presentation writing.
//!
//! [`MutablePresentation`] collects slides built from shapes, then
//! serializes them together with a generated master, two layouts, a notes
//! master and a palette-driven theme.
//!
//! ```rust,no_run
//! use deckforge::ooxml::pptx::{MutablePresentation, SlideLayoutKind};
//! use deckforge::theme;
//!
//! let mut pres = MutablePresentation::new("Roadmap");
//! pres.add_slide(SlideLayoutKind::TitleSlide).set_notes("Welcome everyone");
//! pres.save("roadmap.pptx", theme::default_theme())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod backgrounds;
pub mod format;
mod package;
pub mod template;
pub mod writer;

pub use backgrounds::{Fill, GradientStop, SlideBackground};
pub use format::{Alignment, ImageFormat, TextFormat};
pub use writer::{
    MutablePresentation, MutableShape, MutableSlide, Placeholder, SlideLayoutKind, TextAutofit, TextParagraph,
};
