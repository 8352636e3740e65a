/// Open Packaging Conventions (OPC) writing support.
///
/// A package is a ZIP container of parts. Each part has a content type,
/// registered in `[Content_Types].xml`, and may carry relationships to other
/// parts in a sibling `_rels/*.rels` item.
pub mod constants;
pub mod package;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::{OpcPackage, Part};
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
