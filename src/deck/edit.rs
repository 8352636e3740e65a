//! Edit Sets: proposed slide records produced by the generation collaborator.
//!
//! Generator output is loosely shaped JSON embedded in free text. Everything is
//! validated here, before a merge ever sees it: an entry with a missing
//! mandatory field is rejected with its index, never dropped.
use serde_json::{Map, Value};

use super::slide::{Position, SlideRecord, parse_position_str};
use crate::common::{Error, Result};

/// A validated list of proposed slide records using fractional numbering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditSet {
    records: Vec<SlideRecord>,
}

impl EditSet {
    /// Wrap already-typed records.
    pub fn from_records(records: Vec<SlideRecord>) -> Self {
        Self { records }
    }

    /// Extract and validate the JSON payload embedded in generator output.
    ///
    /// The outermost `[...]` span is preferred; failing that the outermost
    /// `{...}` span, which is treated as a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deckforge::deck::EditSet;
    ///
    /// let text = r#"Here you go: [{"slide_number": 2.1, "title": "New", "content": "- a"}]"#;
    /// let edits = EditSet::from_generated_text(text)?;
    /// assert_eq!(edits.len(), 1);
    /// # Ok::<(), deckforge::Error>(())
    /// ```
    pub fn from_generated_text(text: &str) -> Result<Self> {
        let payload = extract_json(text).ok_or_else(|| {
            Error::MalformedEditSet("response did not contain JSON slide data".to_string())
        })?;
        let value: Value = serde_json::from_str(payload)?;
        Self::from_json_value(value)
    }

    /// Validate a parsed JSON value (an array of entries or a single entry).
    pub fn from_json_value(value: Value) -> Result<Self> {
        let entries = match value {
            Value::Array(items) => items,
            obj @ Value::Object(_) => vec![obj],
            other => {
                return Err(Error::MalformedEditSet(format!(
                    "expected a list of slides, got {}",
                    json_kind(&other)
                )));
            },
        };

        let records = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    #[inline]
    pub fn records(&self) -> &[SlideRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<SlideRecord> {
        self.records
    }
}

impl From<Vec<SlideRecord>> for EditSet {
    fn from(records: Vec<SlideRecord>) -> Self {
        Self::from_records(records)
    }
}

/// Greedy span from the first opening bracket to the last closing one.
fn extract_json(text: &str) -> Option<&str> {
    span_between(text, '[', ']').or_else(|| span_between(text, '{', '}'))
}

fn span_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn parse_entry(index: usize, entry: &Value) -> Result<SlideRecord> {
    let obj = entry
        .as_object()
        .ok_or_else(|| Error::validation(index, format!("expected an object, got {}", json_kind(entry))))?;

    let position = parse_position(index, obj)?;
    let is_delete = position.is_delete_marker();

    let title = match obj.get("title") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) if is_delete => String::new(),
        None | Some(Value::Null) => return Err(Error::validation(index, "missing title")),
        Some(other) => {
            return Err(Error::validation(
                index,
                format!("title must be a string, got {}", json_kind(other)),
            ));
        },
    };

    let content = match obj.get("content") {
        None | Some(Value::Null) if is_delete => String::new(),
        None | Some(Value::Null) => return Err(Error::validation(index, "missing content")),
        Some(value) => flatten_text(value),
    };

    let narration = match obj.get("narration") {
        None | Some(Value::Null) => String::new(),
        Some(value) => flatten_text(value),
    };

    let image_keyword = obj
        .get("image_keyword")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SlideRecord {
        position,
        title,
        content,
        narration,
        image_keyword,
    })
}

fn parse_position(index: usize, obj: &Map<String, Value>) -> Result<Position> {
    let raw = obj
        .get("slide_number")
        .or_else(|| obj.get("position"))
        .ok_or_else(|| Error::validation(index, "missing slide_number"))?;

    match raw {
        Value::Number(n) => n.as_f64().and_then(Position::from_f64),
        Value::String(s) => parse_position_str(s),
        _ => None,
    }
    .ok_or_else(|| Error::validation(index, format!("invalid slide_number {raw}")))
}

/// Coerce a content-like value to plain text.
///
/// Objects become `key: value` lines; lists keep their string items and
/// expand object items the same way; anything else is stringified.
fn flatten_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => object_lines(map).join("\n"),
        Value::Array(items) => {
            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => lines.push(s.clone()),
                    Value::Object(map) => lines.extend(object_lines(map)),
                    _ => {},
                }
            }
            lines.join("\n")
        },
        other => plain(other),
    }
}

fn object_lines(map: &Map<String, Value>) -> Vec<String> {
    map.iter().map(|(k, v)| format!("{}: {}", k, plain(v))).collect()
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_array_from_chatter() {
        let text = "Sure!\n```json\n[{\"slide_number\": 1, \"title\": \"A\", \"content\": \"x\"}]\n```";
        let edits = EditSet::from_generated_text(text).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.records()[0].title, "A");
        assert_eq!(edits.records()[0].narration, "");
    }

    #[test]
    fn test_single_object_becomes_list() {
        let text = r#"{"slide_number": "2.1", "title": "B", "content": "y", "narration": "say y"}"#;
        let edits = EditSet::from_generated_text(text).unwrap();
        assert_eq!(edits.records()[0].position, Position::from_tenths(21));
        assert_eq!(edits.records()[0].narration, "say y");
    }

    #[test]
    fn test_no_json_is_malformed() {
        let err = EditSet::from_generated_text("I cannot help with that").unwrap_err();
        assert!(matches!(err, Error::MalformedEditSet(_)));
    }

    #[test]
    fn test_broken_json_is_malformed() {
        let err = EditSet::from_generated_text("[{\"slide_number\": 1,]").unwrap_err();
        assert!(matches!(err, Error::MalformedEditSet(_)));
    }

    #[test]
    fn test_missing_title_rejected_with_index() {
        let value = json!([
            {"slide_number": 1, "title": "ok", "content": "fine"},
            {"slide_number": 2, "content": "no title"}
        ]);
        let err = EditSet::from_json_value(value).unwrap_err();
        match err {
            Error::Validation { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("title"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_position_rejected() {
        let err = EditSet::from_json_value(json!([{"title": "t", "content": "c"}])).unwrap_err();
        assert!(matches!(err, Error::Validation { index: 0, .. }));
    }

    #[test]
    fn test_invalid_position_rejected() {
        let err =
            EditSet::from_json_value(json!([{"slide_number": "abc", "title": "t", "content": "c"}]))
                .unwrap_err();
        assert!(matches!(err, Error::Validation { index: 0, .. }));
    }

    #[test]
    fn test_missing_content_rejected() {
        let err = EditSet::from_json_value(json!([{"slide_number": 1, "title": "t"}])).unwrap_err();
        assert!(matches!(err, Error::Validation { ref reason, .. } if reason.contains("content")));
    }

    #[test]
    fn test_delete_marker_needs_only_position() {
        let edits = EditSet::from_json_value(json!([{"slide_number": -2}])).unwrap();
        assert!(edits.records()[0].is_delete_marker());
        assert_eq!(edits.records()[0].position.negated(), Position::whole(2));
    }

    #[test]
    fn test_structured_content_is_flattened() {
        let edits = EditSet::from_json_value(json!([
            {"slide_number": 1, "title": "Obj", "content": {"Revenue": "up", "Margin": 12}},
            {"slide_number": 2, "title": "List", "content": ["- one", {"two": "2"}, 3]}
        ]))
        .unwrap();
        assert_eq!(edits.records()[0].content, "Revenue: up\nMargin: 12");
        assert_eq!(edits.records()[1].content, "- one\ntwo: 2");
    }

    #[test]
    fn test_non_object_entry_rejected() {
        let err = EditSet::from_json_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Validation { index: 0, .. }));
        let err = EditSet::from_json_value(json!("nope")).unwrap_err();
        assert!(matches!(err, Error::MalformedEditSet(_)));
    }
}
