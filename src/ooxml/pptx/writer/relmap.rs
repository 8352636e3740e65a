/// Relationship ID mapper for tracking relationships during presentation generation.
///
/// Relationships are created before the slide XML is generated, so the XML
/// can reference the real ids instead of placeholders.
use std::collections::HashMap;

/// Maps slide elements to their relationship IDs, per slide.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// (slide_index, image_index_in_slide) -> relationship ID
    image_ids: HashMap<(usize, usize), String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the relationship of the `image_index_in_slide`-th picture on a slide.
    pub fn add_image(&mut self, slide_index: usize, image_index_in_slide: usize, rel_id: String) {
        self.image_ids.insert((slide_index, image_index_in_slide), rel_id);
    }

    pub fn get_image_id(&self, slide_index: usize, image_index_in_slide: usize) -> Option<&str> {
        self.image_ids
            .get(&(slide_index, image_index_in_slide))
            .map(String::as_str)
    }
}
