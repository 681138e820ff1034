use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReferenceTag {
    #[serde(rename = "reference")]
    Reference,
}

/// Pointer to another document, always serialized as
/// `{"type": "reference", "id": "<opaque id>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Reference {
    #[serde(rename = "type")]
    pub tag: ReferenceTag,
    pub id: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            tag: ReferenceTag::Reference,
            id: id.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
