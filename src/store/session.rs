//! A single editing session and its version history.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::Deck;

/// Free-form state kept alongside a session for subsequent edits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// Source document text the deck was generated from.
    #[serde(default)]
    pub source_text: String,
    /// Theme selector; `None` means the configured default.
    #[serde(default)]
    pub theme: Option<String>,
}

impl SessionContext {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// Session metadata, as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub slide_count: usize,
    pub version_count: usize,
    pub has_source_text: bool,
    pub theme: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug)]
pub(crate) struct Session {
    id: String,
    /// Never empty; the last entry is the current deck.
    history: Vec<Arc<Deck>>,
    context: SessionContext,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(id: String, initial: Deck, context: SessionContext, now: DateTime<Utc>) -> Self {
        Self {
            id,
            history: vec![Arc::new(initial)],
            context,
            created_at: now,
            last_accessed: now,
        }
    }

    pub(crate) fn current(&self) -> Arc<Deck> {
        // `history` starts with one snapshot and `undo` never pops the last.
        Arc::clone(&self.history[self.history.len() - 1])
    }

    pub(crate) fn push(&mut self, deck: Deck) -> Arc<Deck> {
        let snapshot = Arc::new(deck);
        self.history.push(Arc::clone(&snapshot));
        snapshot
    }

    /// Drop the newest snapshot unless it is the only one.
    pub(crate) fn undo(&mut self) -> Arc<Deck> {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }

    #[inline]
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed = now;
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_accessed > ttl
    }

    pub(crate) fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            slide_count: self.current().len(),
            version_count: self.history.len(),
            has_source_text: !self.context.source_text.is_empty(),
            theme: self.context.theme.clone(),
            created_at: self.created_at,
            last_accessed: self.last_accessed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Position, SlideRecord};

    fn one(title: &str) -> Deck {
        Deck::from_records(vec![SlideRecord::new(Position::whole(1), title, "")])
    }

    #[test]
    fn test_undo_never_empties_history() {
        let now = Utc::now();
        let mut session = Session::new("s".into(), one("v1"), SessionContext::default(), now);
        session.push(one("v2"));
        assert_eq!(session.undo().title(), Some("v1"));
        assert_eq!(session.undo().title(), Some("v1"));
        assert_eq!(session.info().version_count, 1);
    }

    #[test]
    fn test_expiry_is_strictly_after_ttl() {
        let now = Utc::now();
        let session = Session::new("s".into(), Deck::new(), SessionContext::default(), now);
        let ttl = Duration::seconds(60);
        assert!(!session.is_expired(now + ttl, ttl));
        assert!(session.is_expired(now + ttl + Duration::seconds(1), ttl));
    }

    #[test]
    fn test_info_reports_context() {
        let ctx = SessionContext::new("notes").with_theme("ocean");
        let session = Session::new("abc".into(), one("t"), ctx, Utc::now());
        let info = session.info();
        assert_eq!(info.session_id, "abc");
        assert_eq!(info.slide_count, 1);
        assert!(info.has_source_text);
        assert_eq!(info.theme.as_deref(), Some("ocean"));
    }
}
