//! Fractional-numbering merge of an Edit Set into a resting deck.
//!
//! Rules, applied in order:
//!
//! 1. An existing slide whose position equals any proposed position is
//!    replaced (the proposed record wins).
//! 2. A proposed negative position `-p` removes the existing slide at `p`.
//!    The marker itself never reaches the result.
//! 3. Survivors and proposed records are concatenated, existing first, and
//!    stable-sorted by position, so ties keep that order.
//! 4. The result is renumbered `1..=N`.
use std::collections::HashSet;

use tracing::debug;

use super::edit::EditSet;
use super::slide::{Deck, Position};

/// Merge `proposed` into `existing`, producing a fresh resting deck.
///
/// Neither input is modified. A delete marker with no matching slide is a
/// no-op.
///
/// # Examples
///
/// ```rust
/// use deckforge::deck::{merge, Deck, EditSet, Position, SlideRecord};
///
/// let deck = Deck::from_records(vec![
///     SlideRecord::new(Position::whole(1), "Intro", ""),
///     SlideRecord::new(Position::whole(2), "Body", ""),
/// ]);
/// let edits = EditSet::from_records(vec![
///     SlideRecord::new(Position::from_tenths(11), "Inserted", ""),
/// ]);
///
/// let merged = merge(&deck, &edits);
/// let titles: Vec<_> = merged.iter().map(|s| s.title.as_str()).collect();
/// assert_eq!(titles, ["Intro", "Inserted", "Body"]);
/// ```
pub fn merge(existing: &Deck, proposed: &EditSet) -> Deck {
    let records = proposed.records();

    let replaced: HashSet<Position> = records.iter().map(|r| r.position).collect();
    let deleted: HashSet<Position> = records
        .iter()
        .filter(|r| r.is_delete_marker())
        .map(|r| r.position.negated())
        .collect();

    let survivors: Vec<_> = existing
        .iter()
        .filter(|s| !replaced.contains(&s.position) && !deleted.contains(&s.position))
        .cloned()
        .collect();
    let kept = survivors.len();

    let merged: Vec<_> = survivors
        .into_iter()
        .chain(records.iter().filter(|r| !r.is_delete_marker()).cloned())
        .collect();

    debug!(
        existing = existing.len(),
        proposed = records.len(),
        deletions = deleted.len(),
        kept,
        result = merged.len(),
        "merged edit set"
    );

    // `from_records` sorts stably, then renumbers.
    Deck::from_records(merged)
}
