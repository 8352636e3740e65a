//! Deckforge - versioned slide decks rendered to PowerPoint
//!
//! This library keeps slide decks as ordered records, revises them through
//! edit sets that use a fractional numbering protocol, tracks every revision
//! per session for undo, and renders a deck into a themed `.pptx` package.
//!
//! # Features
//!
//! - **Merge engine**: insert (`2.1`), replace (`2`) and delete (`-2`) in one
//!   pass, always renumbered to `1..N`
//! - **Version store**: thread-safe per-session history with undo and idle
//!   expiry
//! - **Auto-fit layout**: deterministic font size selection for arbitrary text
//! - **PPTX writer**: OPC package with master, layouts, themes, notes and media
//!
//! # Example - Editing a deck
//!
//! ```
//! use deckforge::deck::{merge, Deck, EditSet, Position, SlideRecord};
//!
//! let deck = Deck::from_records(vec![
//!     SlideRecord::new(Position::whole(1), "Intro", "Hello"),
//!     SlideRecord::new(Position::whole(2), "Plan", "- build\n- ship"),
//! ]);
//!
//! // Insert after slide 1 and delete slide 2
//! let edit = EditSet::from_generated_text(
//!     r#"[{"slide_number": 1.1, "title": "Agenda", "content": "Today"},
//!         {"slide_number": -2}]"#,
//! )?;
//! let next = merge(&deck, &edit);
//! let titles: Vec<&str> = next.iter().map(|s| s.title.as_str()).collect();
//! assert_eq!(titles, ["Intro", "Agenda"]);
//! # Ok::<(), deckforge::Error>(())
//! ```
//!
//! # Example - Sessions and rendering
//!
//! ```no_run
//! use std::collections::HashMap;
//! use deckforge::deck::Deck;
//! use deckforge::render::render;
//! use deckforge::store::{SessionContext, VersionStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = VersionStore::new(std::time::Duration::from_secs(3600));
//! let id = store.create_session(Deck::new(), SessionContext::new("source notes"));
//! let deck = store.get_deck(&id)?;
//! std::fs::write("deck.pptx", render(&deck, &HashMap::new(), "ocean")?)?;
//! # Ok(())
//! # }
//! ```

/// Crate-wide error type, XML escaping and unit helpers
pub mod common;

/// Configuration for the store and the renderer
pub mod config;

/// Slide records, decks, edit sets and the merge engine
pub mod deck;

/// Text normalisation and auto-fit
pub mod layout;

/// OOXML (Office Open XML) presentation writer
pub mod ooxml;

/// Deck to PPTX rendering
pub mod render;

/// Per-session version history with undo and expiry
pub mod store;

/// Named color palettes
pub mod theme;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use config::DeckConfig;
pub use deck::{Deck, EditSet, Position, SlideRecord, merge};
pub use render::{DeckRenderer, render};
pub use store::VersionStore;
