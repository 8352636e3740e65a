//! Common types and utilities shared across the deck, layout and writer layers.

pub mod error;
pub mod unit;
pub mod xml;

pub use error::{Error, Result};
pub use xml::escape_xml;
