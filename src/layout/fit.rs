//! Heuristic auto-fit of body text into a fixed-height region.
use tracing::debug;

use super::normalize::{Paragraph, normalize, paragraphs};

/// Calibration of the line estimate.
///
/// Characters per line at size `pt` are `base_chars_per_line * reference_pt / pt`
/// (a fixed average glyph width); each line occupies `line_height_ratio`
/// inches per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    pub base_chars_per_line: u32,
    pub reference_pt: u32,
    pub line_height_ratio: f64,
}

impl Default for FitMetrics {
    fn default() -> Self {
        Self {
            base_chars_per_line: 80,
            reference_pt: 16,
            line_height_ratio: 0.028,
        }
    }
}

impl FitMetrics {
    /// Characters that fit on one line at `pt`, never less than one.
    pub fn chars_per_line(&self, pt: u32) -> usize {
        let pt = pt.max(1) as u64;
        let cpl = u64::from(self.base_chars_per_line) * u64::from(self.reference_pt) / pt;
        cpl.max(1) as usize
    }

    /// Estimated wrapped line count of `text` at `pt`.
    ///
    /// A blank line counts as one line; any other line as
    /// `chars / chars_per_line + 1`.
    pub fn estimate_lines(&self, text: &str, pt: u32) -> usize {
        let cpl = self.chars_per_line(pt);
        text.split('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    1
                } else {
                    line.chars().count() / cpl + 1
                }
            })
            .sum()
    }

    /// Estimated height in inches of `text` at `pt`.
    pub fn estimate_height(&self, text: &str, pt: u32) -> f64 {
        self.estimate_lines(text, pt) as f64 * f64::from(pt) * self.line_height_ratio
    }
}

/// Result of [`fit_content`]: a font size and the paragraphs to draw with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Font size in whole points.
    pub font_size: u32,
    pub paragraphs: Vec<Paragraph>,
}

impl FittedText {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Choose the largest size in `min_pt..=max_pt` at which `text` is estimated
/// to fit `available_height` inches, and split its normalized form into
/// paragraphs.
///
/// The search walks down from `max_pt` one point at a time and returns
/// `min_pt` when nothing fits, so the result is always within bounds and
/// depends only on the inputs. `max_pt < min_pt` is treated as `min_pt`.
///
/// # Examples
///
/// ```rust
/// use deckforge::layout::fit_content;
///
/// let fitted = fit_content("- short point", 5.0, 16, 10);
/// assert_eq!(fitted.font_size, 16);
/// assert_eq!(fitted.paragraphs[0].display_text(), "  •  short point");
/// ```
pub fn fit_content(text: &str, available_height: f64, max_pt: u32, min_pt: u32) -> FittedText {
    fit_content_with(&FitMetrics::default(), text, available_height, max_pt, min_pt)
}

/// [`fit_content`] with explicit calibration.
pub fn fit_content_with(
    metrics: &FitMetrics,
    text: &str,
    available_height: f64,
    max_pt: u32,
    min_pt: u32,
) -> FittedText {
    // Sizing reads the unnormalized text; appending characters never raises the size.
    let raw = text.replace("\r\n", "\n");
    let font_size = choose_size(metrics, &raw, available_height, max_pt, min_pt);
    let paragraphs = paragraphs(&normalize(text));
    debug!(
        font_size,
        paragraphs = paragraphs.len(),
        available_height,
        "auto-fit body text"
    );
    FittedText {
        font_size,
        paragraphs,
    }
}

fn choose_size(metrics: &FitMetrics, text: &str, available_height: f64, max_pt: u32, min_pt: u32) -> u32 {
    let min_pt = min_pt.max(1);
    let max_pt = max_pt.max(min_pt);
    if !(available_height > 0.0) {
        return min_pt;
    }
    (min_pt..=max_pt)
        .rev()
        .find(|&pt| metrics.estimate_height(text, pt) <= available_height)
        .unwrap_or(min_pt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chars_per_line() {
        let m = FitMetrics::default();
        assert_eq!(m.chars_per_line(16), 80);
        assert_eq!(m.chars_per_line(10), 128);
        assert_eq!(m.chars_per_line(14), 91);
    }

    #[test]
    fn test_estimate_lines() {
        let m = FitMetrics::default();
        assert_eq!(m.estimate_lines("a\n\nb", 16), 3);
        assert_eq!(m.estimate_lines(&"x".repeat(80), 16), 2);
        assert_eq!(m.estimate_lines(&"x".repeat(79), 16), 1);
    }

    #[test]
    fn test_short_text_keeps_max() {
        let fitted = fit_content("Hello", 5.0, 16, 10);
        assert_eq!(fitted.font_size, 16);
        assert_eq!(fitted.paragraphs.len(), 1);
    }

    #[test]
    fn test_long_text_shrinks() {
        // 12 lines of 100 chars wrap twice down to 13pt, once from 12pt (4.03in).
        let text = vec!["y".repeat(100); 12].join("\n");
        let fitted = fit_content(&text, 5.0, 16, 10);
        assert_eq!(fitted.font_size, 12);
    }

    #[test]
    fn test_overflow_returns_floor() {
        let text = vec!["z".repeat(300); 60].join("\n");
        assert_eq!(fit_content(&text, 5.0, 16, 10).font_size, 10);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(fit_content("text", 0.0, 16, 10).font_size, 10);
        assert_eq!(fit_content("text", -3.0, 16, 10).font_size, 10);
        assert_eq!(fit_content("text", f64::NAN, 16, 10).font_size, 10);
        assert_eq!(fit_content("text", 5.0, 8, 10).font_size, 10);
        let empty = fit_content("", 5.0, 16, 10);
        assert_eq!(empty.font_size, 16);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_closing_markup_never_grows_font() {
        let open = format!("*{}", "a".repeat(879));
        let closed = format!("{open}*");
        let short = fit_content(&open, 5.0, 16, 10);
        let long = fit_content(&closed, 5.0, 16, 10);
        assert!(long.font_size <= short.font_size);
        assert_eq!(long.paragraphs[0].display_text(), "a".repeat(879));
    }

    #[test]
    fn test_crlf_sized_like_lf() {
        let lf = vec!["q".repeat(90); 10].join("\n");
        let crlf = lf.replace('\n', "\r\n");
        assert_eq!(fit_content(&lf, 3.0, 16, 10).font_size, fit_content(&crlf, 3.0, 16, 10).font_size);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_size_within_bounds(text in "\\PC{0,400}", height in -1.0f64..8.0, max in 8u32..40, min in 6u32..20) {
            let size = fit_content(&text, height, max, min).font_size;
            prop_assert!(size >= min);
            prop_assert!(size <= max.max(min));
        }

        #[test]
        fn prop_longer_text_never_larger(base in "[a-z *#<>\\[\\]()\n]{0,300}", extra in "[a-z *#<>\\[\\]()\n]{0,300}", height in 0.5f64..6.0) {
            let short = fit_content(&base, height, 16, 10).font_size;
            let long = fit_content(&format!("{base}{extra}"), height, 16, 10).font_size;
            prop_assert!(long <= short);
        }

        #[test]
        fn prop_more_room_never_smaller(text in "[a-z \n]{0,400}", height in 0.5f64..6.0, more in 0.0f64..3.0) {
            let tight = fit_content(&text, height, 16, 10).font_size;
            let roomy = fit_content(&text, height + more, 16, 10).font_size;
            prop_assert!(roomy >= tight);
        }

        #[test]
        fn prop_deterministic(text in "\\PC{0,200}", height in 0.0f64..6.0) {
            prop_assert_eq!(fit_content(&text, height, 16, 10), fit_content(&text, height, 16, 10));
        }
    }
}
