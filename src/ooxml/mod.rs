//! Office Open XML (OOXML) writing.
//!
//! Two layers:
//!
//! 1. **OPC layer** (`opc`): parts, relationships and the ZIP container
//! 2. **PresentationML** (`pptx`): slides, shapes and the fixed template parts
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
