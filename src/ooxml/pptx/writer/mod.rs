/// PresentationML writer: slides, shapes and relationship bookkeeping.
pub mod pres;
pub mod relmap;
pub mod shape;
pub mod slide;

pub use pres::MutablePresentation;
pub use shape::{MutableShape, Placeholder, TextAutofit, TextParagraph};
pub use slide::{MutableSlide, SlideLayoutKind};
