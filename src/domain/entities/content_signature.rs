//! Content signature entity
//!
//! The byte markers that identify one kind of web asset inside a raw
//! image, plus the rules that bound where a match may start and end.

use super::content_block::ContentKind;
use crate::core::find_from;

/// Markers and bounds used to locate one content kind
#[derive(Debug, Clone)]
pub struct ContentSignature {
    /// The kind of content this signature identifies
    kind: ContentKind,
    /// Opening markers, highest priority first
    markers: Vec<Vec<u8>>,
    /// Optional marker that terminates the content
    closing_marker: Option<Vec<u8>>,
    /// A match is only accepted if it starts strictly after this offset
    min_start: Option<usize>,
}

impl ContentSignature {
    /// Creates a signature with no closing marker and no start restriction
    pub fn new(kind: ContentKind, markers: &[&[u8]]) -> Self {
        Self {
            kind,
            markers: markers.iter().map(|m| m.to_vec()).collect(),
            closing_marker: None,
            min_start: None,
        }
    }

    /// Terminates the content right after `marker`
    pub fn with_closing_marker(mut self, marker: &[u8]) -> Self {
        self.closing_marker = Some(marker.to_vec());
        self
    }

    /// Only accepts matches starting after `offset`
    pub fn starting_after(mut self, offset: usize) -> Self {
        self.min_start = Some(offset);
        self
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn markers(&self) -> impl Iterator<Item = &[u8]> {
        self.markers.iter().map(|m| m.as_slice())
    }

    /// Whether a match at `offset` clears the minimum start restriction
    pub fn accepts_start(&self, offset: usize) -> bool {
        self.min_start.is_none_or(|min| offset > min)
    }

    /// Finds the exclusive end of the closing marker at or after `start`
    pub fn find_closing(&self, data: &[u8], start: usize) -> Option<usize> {
        let closing = self.closing_marker.as_deref()?;
        find_from(data, closing, start).map(|pos| pos + closing.len())
    }
}
