//! Deck renderer: one title slide followed by one content slide per record.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::Result;
use crate::common::unit::{Rect, inches_to_emu, pt_to_emu_f64};
use crate::config::DeckConfig;
use crate::deck::{Deck, SlideRecord};
use crate::layout::{FittedText, fit_content};
use crate::ooxml::pptx::template::{FONT_BODY, FONT_TITLE};
use crate::ooxml::pptx::writer::pres::{SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use crate::ooxml::pptx::{
    Alignment, Fill, ImageFormat, MutablePresentation, MutableSlide, Placeholder, SlideBackground,
    SlideLayoutKind, TextAutofit, TextFormat, TextParagraph,
};
use crate::theme::{self, Palette, Theme};

const BACKGROUND_ANGLE: f64 = 315.0;
const TITLE_SLIDE_TITLE_PT: f64 = 40.0;
const TITLE_SLIDE_SUBTITLE_PT: f64 = 20.0;
const CONTENT_TITLE_PT: f64 = 28.0;
const BADGE_PT: f64 = 12.0;

const CONTENT_LEFT_IN: f64 = 0.8;
const FULL_WIDTH_IN: f64 = 11.5;
const IMAGE_TEXT_WIDTH_IN: f64 = 7.5;
const BODY_TOP_IN: f64 = 1.7;
/// Height of the body region, in inches.
pub const BODY_HEIGHT_IN: f64 = 5.0;
const ACCENT_BAR_HEIGHT_IN: f64 = 0.08;

const TITLE_FALLBACK: &str = "Presentation";

/// Image frame on content slides that have a picture.
fn image_rect() -> Rect {
    Rect::from_inches(8.8, 1.8, 4.0, 4.5)
}

/// Renders decks into PPTX bytes.
///
/// ```rust
/// use std::collections::HashMap;
/// use deckforge::deck::{Deck, Position, SlideRecord};
/// use deckforge::render::DeckRenderer;
///
/// let deck = Deck::from_records(vec![
///     SlideRecord::new(Position::whole(1), "Launch plan", "What ships in Q3"),
///     SlideRecord::new(Position::whole(2), "Scope", "- API\n- CLI"),
/// ]);
/// let bytes = DeckRenderer::default().render(&deck, &HashMap::new(), "ocean")?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), deckforge::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeckRenderer {
    default_theme: String,
    subtitle_max_chars: usize,
    body_max_pt: u32,
    body_min_pt: u32,
}

impl Default for DeckRenderer {
    fn default() -> Self {
        Self::from_config(&DeckConfig::default())
    }
}

impl DeckRenderer {
    pub fn from_config(config: &DeckConfig) -> Self {
        Self {
            default_theme: config.default_theme.clone(),
            subtitle_max_chars: config.subtitle_max_chars,
            body_max_pt: config.body_max_font_pt,
            body_min_pt: config.body_min_font_pt,
        }
    }

    /// Resolve `theme_name`, using the configured default when it is blank.
    pub fn theme(&self, theme_name: &str) -> &'static Theme {
        if theme_name.trim().is_empty() {
            theme::resolve(&self.default_theme)
        } else {
            theme::resolve(theme_name)
        }
    }

    /// Build the presentation model without serializing it.
    ///
    /// `image_paths` is keyed by 1-based slide number. Unreadable or
    /// unrecognised images are skipped with a warning.
    pub fn build(&self, deck: &Deck, image_paths: &HashMap<u32, PathBuf>, palette: &Palette) -> MutablePresentation {
        let title = deck
            .title()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(TITLE_FALLBACK);
        let mut pres = MutablePresentation::new(title);

        let mut records = deck.iter();
        if let Some(first) = records.next() {
            self.add_title_slide(&mut pres, first, palette);
        }
        for (offset, record) in records.enumerate() {
            let sequence = offset as u32 + 2;
            let image = record
                .position
                .slide_number()
                .and_then(|n| image_paths.get(&n))
                .and_then(|path| load_image(path));
            self.add_content_slide(&mut pres, record, sequence, image, palette);
        }
        pres
    }

    /// Render `deck` with the theme named `theme_name` to PPTX bytes.
    pub fn render(&self, deck: &Deck, image_paths: &HashMap<u32, PathBuf>, theme_name: &str) -> Result<Vec<u8>> {
        let theme = self.theme(theme_name);
        let pres = self.build(deck, image_paths, &theme.palette);
        let bytes = pres.to_bytes(theme)?;
        info!(
            slides = pres.slide_count(),
            theme = theme.name,
            bytes = bytes.len(),
            "deck rendered"
        );
        Ok(bytes)
    }

    /// Render and write the result to `path`.
    pub fn render_to_file(
        &self,
        deck: &Deck,
        image_paths: &HashMap<u32, PathBuf>,
        theme_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.render(deck, image_paths, theme_name)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn add_title_slide(&self, pres: &mut MutablePresentation, record: &SlideRecord, palette: &Palette) {
        let slide = pres.add_slide(SlideLayoutKind::TitleSlide);
        slide.set_background(SlideBackground::linear_gradient(
            BACKGROUND_ANGLE,
            palette.background_start,
            palette.background_end,
        ));

        slide.add_rectangle(
            Rect::new(inches_to_emu(0.3), inches_to_emu(0.3), inches_to_emu(0.5), pt_to_emu_f64(4.0)),
            Fill::Solid(palette.accent),
        );

        let title = if record.title.trim().is_empty() {
            TITLE_FALLBACK
        } else {
            record.title.as_str()
        };
        slide.add_placeholder(
            Placeholder::CenteredTitle,
            Rect::from_inches(1.0, 2.0, 11.3, 2.0),
            vec![
                TextParagraph::new(
                    title,
                    TextFormat::new()
                        .font(FONT_TITLE)
                        .size(TITLE_SLIDE_TITLE_PT)
                        .bold(true)
                        .color(palette.title),
                )
                .align(Alignment::Center),
            ],
        );

        let subtitle = truncate_subtitle(&record.content, self.subtitle_max_chars);
        if !subtitle.trim().is_empty() {
            slide.add_placeholder(
                Placeholder::Subtitle,
                Rect::from_inches(2.0, 4.2, 9.3, 1.0),
                vec![
                    TextParagraph::new(
                        subtitle,
                        TextFormat::new()
                            .font(FONT_BODY)
                            .size(TITLE_SLIDE_SUBTITLE_PT)
                            .color(palette.subtitle),
                    )
                    .align(Alignment::Center),
                ],
            );
        }

        add_accent_bar(slide, palette, inches_to_emu(5.5));
        slide.set_notes(&record.narration);
    }

    fn add_content_slide(
        &self,
        pres: &mut MutablePresentation,
        record: &SlideRecord,
        sequence: u32,
        image: Option<(Vec<u8>, ImageFormat)>,
        palette: &Palette,
    ) {
        let slide = pres.add_slide(SlideLayoutKind::TitleAndContent);
        slide.set_background(SlideBackground::linear_gradient(
            BACKGROUND_ANGLE,
            palette.background_start,
            palette.background_end,
        ));

        // Sequence badge, top right
        slide.add_text_box(
            Rect::new(
                SLIDE_WIDTH_EMU - inches_to_emu(1.2),
                inches_to_emu(0.3),
                inches_to_emu(0.8),
                inches_to_emu(0.4),
            ),
            vec![
                TextParagraph::new(
                    sequence.to_string(),
                    TextFormat::new().font(FONT_BODY).size(BADGE_PT).color(palette.muted),
                )
                .align(Alignment::Right),
            ],
        );

        let text_width = if image.is_some() {
            IMAGE_TEXT_WIDTH_IN
        } else {
            FULL_WIDTH_IN
        };

        slide.add_placeholder(
            Placeholder::Title,
            Rect::from_inches(CONTENT_LEFT_IN, 0.5, text_width, 1.0),
            vec![TextParagraph::new(
                record.title.as_str(),
                TextFormat::new()
                    .font(FONT_TITLE)
                    .size(CONTENT_TITLE_PT)
                    .bold(true)
                    .color(palette.title),
            )],
        );

        slide.add_rectangle(
            Rect::new(
                inches_to_emu(CONTENT_LEFT_IN),
                inches_to_emu(1.45),
                inches_to_emu(2.0),
                pt_to_emu_f64(3.0),
            ),
            Fill::Solid(palette.accent),
        );

        let fitted = fit_content(&record.content, BODY_HEIGHT_IN, self.body_max_pt, self.body_min_pt);
        debug!(
            slide = sequence,
            font_size = fitted.font_size,
            with_image = image.is_some(),
            "content slide laid out"
        );
        slide
            .add_placeholder(
                Placeholder::Body,
                Rect::from_inches(CONTENT_LEFT_IN, BODY_TOP_IN, text_width, BODY_HEIGHT_IN),
                body_paragraphs(&fitted, palette),
            )
            .autofit(TextAutofit::ShrinkText);

        if let Some((data, format)) = image {
            slide.add_picture(data, format, image_rect(), record.image_keyword.as_str());
        }

        add_accent_bar(slide, palette, SLIDE_HEIGHT_EMU - inches_to_emu(ACCENT_BAR_HEIGHT_IN + 0.3));
        slide.set_notes(&record.narration);
    }
}

/// Render `deck` with default settings.
///
/// Equivalent to `DeckRenderer::default().render(..)`.
pub fn render(deck: &Deck, image_paths: &HashMap<u32, PathBuf>, theme_name: &str) -> Result<Vec<u8>> {
    DeckRenderer::default().render(deck, image_paths, theme_name)
}

/// First `max_chars` characters of `content`, with `...` appended when cut.
pub fn truncate_subtitle(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn body_paragraphs(fitted: &FittedText, palette: &Palette) -> Vec<TextParagraph> {
    let format = TextFormat::new()
        .font(FONT_BODY)
        .size(f64::from(fitted.font_size))
        .color(palette.body);
    fitted
        .paragraphs
        .iter()
        .map(|p| TextParagraph::new(p.display_text(), format.clone()).spacing(f64::from(p.spacing_pt())))
        .collect()
}

fn add_accent_bar(slide: &mut MutableSlide, palette: &Palette, y: i64) {
    slide.add_rectangle(
        Rect::new(
            inches_to_emu(0.5),
            y,
            SLIDE_WIDTH_EMU - inches_to_emu(1.0),
            inches_to_emu(ACCENT_BAR_HEIGHT_IN),
        ),
        Fill::linear(0.0, palette.accent, palette.accent_light),
    );
}

/// Read an image file and sniff its format; `None` (with a warning) when the
/// file is missing, unreadable or not a known image type.
fn load_image(path: &Path) -> Option<(Vec<u8>, ImageFormat)> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "image unavailable, using full-width layout");
            return None;
        },
    };
    match ImageFormat::detect_from_bytes(&data) {
        Some(format) => Some((data, format)),
        None => {
            warn!(path = %path.display(), "unrecognised image format, using full-width layout");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Position;
    use crate::ooxml::pptx::MutableShape;
    use std::io::Write;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn record(n: i64, title: &str, content: &str) -> SlideRecord {
        SlideRecord::new(Position::whole(n), title, content)
    }

    fn sample_deck() -> Deck {
        Deck::from_records(vec![
            record(1, "Launch", "Overview of the launch"),
            record(2, "Scope", "- API\n- CLI").with_narration("Walk through scope"),
            record(3, "Risks", "Nothing major"),
        ])
    }

    fn palette() -> Palette {
        theme::default_theme().palette
    }

    fn has_picture(shapes: &[MutableShape]) -> bool {
        shapes.iter().any(|s| s.get_image_data().is_some())
    }

    #[test]
    fn test_truncate_subtitle() {
        assert_eq!(truncate_subtitle("short", 120), "short");
        let long = "x".repeat(130);
        let cut = truncate_subtitle(&long, 120);
        assert_eq!(cut.chars().count(), 123);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_subtitle(&"é".repeat(5), 3), "ééé...");
        assert_eq!(truncate_subtitle(&"y".repeat(120), 120), "y".repeat(120));
    }

    #[test]
    fn test_one_slide_per_record() {
        let pres = DeckRenderer::default().build(&sample_deck(), &HashMap::new(), &palette());
        assert_eq!(pres.slide_count(), 3);
        assert_eq!(pres.slides()[0].layout(), SlideLayoutKind::TitleSlide);
        assert_eq!(pres.slides()[1].layout(), SlideLayoutKind::TitleAndContent);
        assert_eq!(pres.slides()[0].title().as_deref(), Some("Launch"));
        assert_eq!(pres.slides()[2].title().as_deref(), Some("Risks"));
        assert_eq!(pres.title(), "Launch");
    }

    #[test]
    fn test_empty_deck_has_no_slides() {
        let pres = DeckRenderer::default().build(&Deck::new(), &HashMap::new(), &palette());
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.title(), "Presentation");
    }

    #[test]
    fn test_badge_shows_sequence_position() {
        let pres = DeckRenderer::default().build(&sample_deck(), &HashMap::new(), &palette());
        let badge = pres.slides()[2].shapes()[0].text();
        assert_eq!(badge.as_deref(), Some("3"));
    }

    #[test]
    fn test_narration_goes_to_notes() {
        let pres = DeckRenderer::default().build(&sample_deck(), &HashMap::new(), &palette());
        assert!(!pres.slides()[0].has_notes());
        assert_eq!(pres.slides()[1].notes(), Some("Walk through scope"));
    }

    #[test]
    fn test_image_narrows_text_column() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(PNG_BYTES).unwrap();
        let images = HashMap::from([(2, file.path().to_path_buf())]);

        let pres = DeckRenderer::default().build(&sample_deck(), &images, &palette());
        let with_image = &pres.slides()[1];
        let without_image = &pres.slides()[2];
        assert!(has_picture(with_image.shapes()));
        assert!(!has_picture(without_image.shapes()));

        let body_width = |slide: &MutableSlide| {
            slide
                .shapes()
                .iter()
                .find(|s| s.placeholder() == Some(Placeholder::Body))
                .map(|s| s.rect().width)
                .unwrap()
        };
        assert_eq!(body_width(with_image), inches_to_emu(IMAGE_TEXT_WIDTH_IN));
        assert_eq!(body_width(without_image), inches_to_emu(FULL_WIDTH_IN));
    }

    #[test]
    fn test_missing_or_invalid_image_degrades() {
        let mut junk = tempfile::NamedTempFile::new().unwrap();
        junk.write_all(b"not an image at all").unwrap();
        let images = HashMap::from([
            (2, PathBuf::from("/nonexistent/picture.png")),
            (3, junk.path().to_path_buf()),
        ]);

        let pres = DeckRenderer::default().build(&sample_deck(), &images, &palette());
        assert_eq!(pres.slide_count(), 3);
        assert!(pres.slides().iter().all(|s| !has_picture(s.shapes())));

        let width_of = |slide: &MutableSlide, kind: Placeholder| {
            slide
                .shapes()
                .iter()
                .find(|s| s.placeholder() == Some(kind))
                .map(|s| s.rect().width)
                .unwrap()
        };
        for slide in &pres.slides()[1..] {
            assert_eq!(width_of(slide, Placeholder::Body), inches_to_emu(FULL_WIDTH_IN));
            assert_eq!(width_of(slide, Placeholder::Title), inches_to_emu(FULL_WIDTH_IN));
        }
    }

    #[test]
    fn test_blank_theme_uses_configured_default() {
        let renderer = DeckRenderer::from_config(&DeckConfig::default().with_default_theme("forest"));
        assert_eq!(renderer.theme("").name, "forest");
        assert_eq!(renderer.theme("sunset").name, "sunset");
        assert_eq!(renderer.theme("no-such-theme").name, theme::DEFAULT_THEME);
    }

    #[test]
    fn test_render_returns_zip() {
        let bytes = render(&sample_deck(), &HashMap::new(), "midnight").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
