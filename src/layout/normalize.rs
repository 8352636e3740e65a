//! Markup stripping and paragraph classification.
use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid strong regex"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid emphasis regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid heading regex"));
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank-run regex"));

/// Leading markers that turn a line into a bullet paragraph.
const BULLET_MARKERS: [&str; 4] = ["- ", "• ", "* ", "– "];

/// Glyph prefix of a rendered bullet paragraph.
pub const BULLET_PREFIX: &str = "  •  ";

/// Reduce lightly marked-up text to plain text.
///
/// Tags, bold/italic asterisks, link targets and heading hashes are removed,
/// three or more consecutive newlines collapse to one blank line, and the
/// result is trimmed.
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = TAG.replace_all(&text, "");
    let text = STRONG.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParagraphKind {
    Bullet,
    Plain,
}

/// One non-empty line of slide body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    /// Text without the bullet marker.
    pub text: String,
}

impl Paragraph {
    /// Text as drawn on the slide, with the canonical bullet glyph.
    pub fn display_text(&self) -> String {
        match self.kind {
            ParagraphKind::Bullet => format!("{BULLET_PREFIX}{}", self.text),
            ParagraphKind::Plain => self.text.clone(),
        }
    }

    /// Spacing before and after the paragraph, in points.
    pub fn spacing_pt(&self) -> u32 {
        match self.kind {
            ParagraphKind::Bullet => 2,
            ParagraphKind::Plain => 4,
        }
    }
}

/// Split normalised text into paragraphs, skipping blank lines.
pub fn paragraphs(normalized: &str) -> Vec<Paragraph> {
    normalized
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify)
        .collect()
}

fn classify(line: &str) -> Paragraph {
    match BULLET_MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
        Some(rest) => Paragraph {
            kind: ParagraphKind::Bullet,
            text: rest.trim_start().to_string(),
        },
        None => Paragraph {
            kind: ParagraphKind::Plain,
            text: line.to_string(),
        },
    }
}
