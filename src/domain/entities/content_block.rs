//! Content recovered by signature matching

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Kinds of web asset the signature fallback knows how to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Markup,
    Stylesheet,
    Script,
}

impl ContentKind {
    /// File name used when writing a recovered block
    pub fn file_name(&self) -> &'static str {
        match self {
            ContentKind::Markup => "index.html",
            ContentKind::Stylesheet => "style.css",
            ContentKind::Script => "app.js",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContentKind::Markup => "HTML",
            ContentKind::Stylesheet => "CSS",
            ContentKind::Script => "JavaScript",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A byte range believed to hold one file of a known kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedContentBlock {
    pub content_kind: ContentKind,
    /// Inclusive start offset in the image
    pub start_offset: usize,
    /// Exclusive end offset in the image
    pub end_offset: usize,
    /// Marker that anchored the block, lossily decoded
    pub marker: String,
}

impl ExtractedContentBlock {
    pub fn new(
        content_kind: ContentKind,
        start_offset: usize,
        end_offset: usize,
        marker: &[u8],
    ) -> Self {
        Self {
            content_kind,
            start_offset,
            end_offset,
            marker: String::from_utf8_lossy(marker).into_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }
}
