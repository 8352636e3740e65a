//! Slide records, fixed-point positions and the resting deck.
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A slide position with one decimal digit of precision.
///
/// Stored as tenths in an `i64`, so `2`, `2.0` and `2.04` are the same key and
/// equality never depends on floating-point representation. Fractional values
/// (`2.1`) insert between whole slides during a merge; negative values are
/// delete markers for the slide at the negated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(i64);

impl Position {
    /// Tenths per whole slide number.
    pub const SCALE: i64 = 10;

    /// Build a position from a raw number, rounding to one decimal digit.
    ///
    /// Rounding follows the one-digit decimal rendering of the exact binary
    /// value, so `2.15` (stored just below 2.15) becomes `2.1`.
    /// Returns `None` for NaN, infinite or out-of-range input.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > (i64::MAX / (2 * Self::SCALE)) as f64 {
            return None;
        }
        let rendered = format!("{value:.1}");
        let (whole, frac) = rendered.split_once('.')?;
        let negative = whole.starts_with('-');
        let whole: i64 = whole.trim_start_matches('-').parse().ok()?;
        let frac: i64 = frac.parse().ok()?;
        let tenths = whole.checked_mul(Self::SCALE)?.checked_add(frac)?;
        Some(Position(if negative { -tenths } else { tenths }))
    }

    /// Position of the `n`-th slide (1-based) in a resting deck.
    #[inline]
    pub const fn whole(n: i64) -> Self {
        Position(n * Self::SCALE)
    }

    /// Build a position directly from tenths.
    #[inline]
    pub const fn from_tenths(tenths: i64) -> Self {
        Position(tenths)
    }

    #[inline]
    pub const fn tenths(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn negated(self) -> Self {
        Position(-self.0)
    }

    /// Negative positions mark the slide at the negated position for removal.
    #[inline]
    pub const fn is_delete_marker(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn is_whole(self) -> bool {
        self.0 % Self::SCALE == 0
    }

    /// The 1-based slide number, if this is a positive whole position.
    pub fn slide_number(self) -> Option<u32> {
        if self.0 > 0 && self.is_whole() {
            u32::try_from(self.0 / Self::SCALE).ok()
        } else {
            None
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{}",
            sign,
            abs / Self::SCALE as u64,
            abs % Self::SCALE as u64
        )
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 / Self::SCALE)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PositionVisitor;

        impl Visitor<'_> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a slide number as a number or numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Position, E> {
                Position::from_f64(v as f64).ok_or_else(|| E::custom("slide number out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Position, E> {
                Position::from_f64(v as f64).ok_or_else(|| E::custom("slide number out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Position, E> {
                Position::from_f64(v).ok_or_else(|| E::custom("slide number is not finite"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Position, E> {
                parse_position_str(v).ok_or_else(|| E::custom(format!("invalid slide number '{v}'")))
            }
        }

        deserializer.deserialize_any(PositionVisitor)
    }
}

/// Parse a slide number written as text (`"2"`, `"2.1"`, `" -3 "`).
pub(crate) fn parse_position_str(s: &str) -> Option<Position> {
    s.trim().parse::<f64>().ok().and_then(Position::from_f64)
}

/// One slide: a title, a plain-text body, optional narration and an image hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    #[serde(rename = "slide_number", alias = "position")]
    pub position: Position,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub image_keyword: String,
}

impl SlideRecord {
    /// Create a record at `position` with a title and body.
    pub fn new(position: Position, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            content: content.into(),
            narration: String::new(),
            image_keyword: String::new(),
        }
    }

    /// A delete marker for the slide currently at `target`.
    pub fn delete_marker(target: Position) -> Self {
        Self::new(target.negated(), String::new(), String::new())
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = narration.into();
        self
    }

    pub fn with_image_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.image_keyword = keyword.into();
        self
    }

    #[inline]
    pub fn is_delete_marker(&self) -> bool {
        self.position.is_delete_marker()
    }
}

/// The preview shape of a slide handed to the surrounding service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlidePreview {
    pub slide_number: u32,
    pub title: String,
    pub content: String,
    pub narration: String,
    pub image_keyword: String,
}

/// An ordered deck at rest: positions are exactly `1..=N`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SlideRecord>", into = "Vec<SlideRecord>")]
pub struct Deck {
    slides: Vec<SlideRecord>,
}

impl Deck {
    /// An empty deck.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort arbitrary records by position (stable) and renumber them `1..=N`.
    pub fn from_records(mut records: Vec<SlideRecord>) -> Self {
        records.sort_by_key(|r| r.position);
        renumber(&mut records);
        Self { slides: records }
    }

    /// Decode a deck from a JSON array of slide records.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| crate::Error::MalformedDeck(e.to_string()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[inline]
    pub fn slides(&self) -> &[SlideRecord] {
        &self.slides
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlideRecord> {
        self.slides.iter()
    }

    /// Look up a slide by its 1-based number.
    pub fn get(&self, slide_number: u32) -> Option<&SlideRecord> {
        let index = usize::try_from(slide_number).ok()?.checked_sub(1)?;
        self.slides.get(index)
    }

    /// Title of the first slide, used as the document title.
    pub fn title(&self) -> Option<&str> {
        self.slides.first().map(|s| s.title.as_str())
    }

    pub fn into_records(self) -> Vec<SlideRecord> {
        self.slides
    }

    /// Integer-numbered view of the deck for previews.
    pub fn preview(&self) -> Vec<SlidePreview> {
        self.slides
            .iter()
            .enumerate()
            .map(|(i, s)| SlidePreview {
                slide_number: (i + 1) as u32,
                title: s.title.clone(),
                content: s.content.clone(),
                narration: s.narration.clone(),
                image_keyword: s.image_keyword.clone(),
            })
            .collect()
    }
}

impl From<Vec<SlideRecord>> for Deck {
    fn from(records: Vec<SlideRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<Deck> for Vec<SlideRecord> {
    fn from(deck: Deck) -> Self {
        deck.slides
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a SlideRecord;
    type IntoIter = std::slice::Iter<'a, SlideRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

/// Rewrite positions to consecutive whole numbers in slice order.
pub(crate) fn renumber(records: &mut [SlideRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.position = Position::whole(i as i64 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_normalization() {
        assert_eq!(Position::from_f64(2.0), Position::from_f64(2.0000001));
        assert_eq!(Position::from_f64(2.1).map(Position::tenths), Some(21));
        assert_eq!(Position::from_f64(-3.0).map(Position::tenths), Some(-30));
        assert_eq!(Position::from_f64(f64::NAN), None);
        assert_eq!(Position::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_deck_from_json_reports_malformed_deck() {
        let deck = Deck::from_json(r#"[{"slide_number": 2, "title": "B"}, {"slide_number": 1, "title": "A"}]"#).unwrap();
        assert_eq!(deck.title(), Some("A"));

        let err = Deck::from_json(r#"{"slides": "#).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedDeck(_)));
        assert!(err.to_string().starts_with("Malformed deck"));
    }

    #[test]
    fn test_position_rounds_binary_value() {
        assert_eq!(Position::from_f64(2.15).map(Position::tenths), Some(21));
        assert_eq!(Position::from_f64(2.35).map(Position::tenths), Some(24));
        assert_eq!(Position::from_f64(2.04).map(Position::tenths), Some(20));
        assert_eq!(Position::from_f64(-2.15).map(Position::tenths), Some(-21));
        assert_eq!(Position::from_f64(-0.04).map(Position::tenths), Some(0));
        assert_eq!(Position::from_f64(1e300), None);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::from_tenths(21).to_string(), "2.1");
        assert_eq!(Position::whole(3).to_string(), "3.0");
        assert_eq!(Position::from_tenths(-20).to_string(), "-2.0");
        assert_eq!(Position::from_tenths(-5).to_string(), "-0.5");
    }

    #[test]
    fn test_position_slide_number() {
        assert_eq!(Position::whole(4).slide_number(), Some(4));
        assert_eq!(Position::from_tenths(41).slide_number(), None);
        assert_eq!(Position::whole(-1).slide_number(), None);
        assert_eq!(Position::whole(0).slide_number(), None);
    }

    #[test]
    fn test_position_serde() {
        let whole: Position = serde_json::from_str("2").unwrap();
        let frac: Position = serde_json::from_str("2.1").unwrap();
        let text: Position = serde_json::from_str("\"2.10\"").unwrap();
        assert_eq!(whole, Position::whole(2));
        assert_eq!(frac, text);
        assert_eq!(serde_json::to_string(&whole).unwrap(), "2");
        assert_eq!(serde_json::to_string(&frac).unwrap(), "2.1");
        assert!(serde_json::from_str::<Position>("\"two\"").is_err());
    }

    #[test]
    fn test_deck_from_records_sorts_and_renumbers() {
        let deck = Deck::from_records(vec![
            SlideRecord::new(Position::whole(5), "C", ""),
            SlideRecord::new(Position::from_tenths(11), "B", ""),
            SlideRecord::new(Position::whole(1), "A", ""),
        ]);
        let titles: Vec<_> = deck.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        let positions: Vec<_> = deck.iter().map(|s| s.position).collect();
        assert_eq!(positions, [Position::whole(1), Position::whole(2), Position::whole(3)]);
        assert_eq!(deck.get(2).map(|s| s.title.as_str()), Some("B"));
        assert!(deck.get(0).is_none());
        assert!(deck.get(4).is_none());
    }

    #[test]
    fn test_deck_json_round_trip_keeps_invariant() {
        let json = r#"[
            {"slide_number": 3, "title": "Three", "content": "c"},
            {"slide_number": 1.5, "title": "Half", "content": "b", "narration": "n"}
        ]"#;
        let deck: Deck = serde_json::from_str(json).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides()[0].title, "Half");
        assert_eq!(deck.slides()[0].position, Position::whole(1));
        assert_eq!(deck.slides()[0].narration, "n");

        let out = serde_json::to_value(&deck).unwrap();
        assert_eq!(out[1]["slide_number"], 2);
    }

    #[test]
    fn test_preview() {
        let deck = Deck::from_records(vec![
            SlideRecord::new(Position::whole(1), "Intro", "Hello").with_image_keyword("sunrise"),
        ]);
        let preview = deck.preview();
        assert_eq!(preview[0].slide_number, 1);
        assert_eq!(preview[0].image_keyword, "sunrise");
        assert_eq!(deck.title(), Some("Intro"));
    }
}
