//! Layout engine: text normalisation and deterministic font auto-fit.
mod fit;
mod normalize;

pub use fit::{FitMetrics, FittedText, fit_content, fit_content_with};
pub use normalize::{BULLET_PREFIX, Paragraph, ParagraphKind, normalize, paragraphs};
