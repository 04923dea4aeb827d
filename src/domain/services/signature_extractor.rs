//! Signature-based content recovery
//!
//! Fallback used when no structured object header can be found. Each
//! known content kind is located by its opening markers and cut off either
//! at an explicit closing marker or where the erased-flash padding begins.

use crate::core::find_from;
use crate::domain::entities::{ContentKind, ContentSignature, ExtractedContentBlock};
use aho_corasick::AhoCorasick;

/// Consecutive padding bytes that mark the end of a file
pub const PADDING_RUN_LIMIT: usize = 256;
/// Blocks must be strictly longer than this to be kept
pub const MIN_BLOCK_LEN: usize = 50;
/// Stylesheet and script matches must start after this offset
pub const HEADER_REGION_LEN: usize = 100;

/// A way of pulling content blocks out of raw bytes without filesystem metadata
pub trait RecoveryStrategy: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Attempts recovery, returning zero or more blocks
    fn recover(&self, data: &[u8]) -> Vec<ExtractedContentBlock>;
}

/// Recovers web assets by their text signatures
///
/// # Example
///
/// ```
/// use flashprobe::domain::services::{RecoveryStrategy, SignatureExtractor};
///
/// let mut image = b"<!DOCTYPE html><html><body>".to_vec();
/// image.extend(std::iter::repeat(b'x').take(64));
/// image.extend(b"</body></html>");
/// image.extend(std::iter::repeat(0xFF).take(512));
///
/// let blocks = SignatureExtractor::default().recover(&image);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].end_offset, image.len() - 512);
/// ```
#[derive(Debug, Clone)]
pub struct SignatureExtractor {
    signatures: Vec<ContentSignature>,
}

impl SignatureExtractor {
    /// Creates an extractor with no signatures
    pub fn new() -> Self {
        Self {
            signatures: Vec::new(),
        }
    }

    /// Signatures for the HTML, CSS and JavaScript assets a device web UI ships
    pub fn web_assets() -> Self {
        let mut extractor = Self::new();

        extractor.register(
            ContentSignature::new(
                ContentKind::Markup,
                &[b"<!DOCTYPE html", b"<html", b"<HTML"],
            )
            .with_closing_marker(b"</html>"),
        );

        extractor.register(
            ContentSignature::new(
                ContentKind::Stylesheet,
                &[b"body {", b"body{", b"/*", b"@media"],
            )
            .starting_after(HEADER_REGION_LEN),
        );

        extractor.register(
            ContentSignature::new(
                ContentKind::Script,
                &[b"function", b"const ", b"let ", b"var ", b"// JavaScript"],
            )
            .starting_after(HEADER_REGION_LEN),
        );

        extractor
    }

    /// Adds a signature; signatures are tried in registration order
    pub fn register(&mut self, signature: ContentSignature) {
        self.signatures.push(signature);
    }

    pub fn signatures(&self) -> &[ContentSignature] {
        &self.signatures
    }

    /// Finds the block for one signature, trying its markers in priority order
    ///
    /// Only the first occurrence of each marker is considered.
    pub fn recover_kind(
        &self,
        data: &[u8],
        signature: &ContentSignature,
    ) -> Option<ExtractedContentBlock> {
        for marker in signature.markers() {
            let Some(start) = find_from(data, marker, 0) else {
                continue;
            };

            if !signature.accepts_start(start) {
                tracing::debug!(
                    "{} marker {:?} at 0x{:08x} is inside the header region",
                    signature.kind(),
                    String::from_utf8_lossy(marker),
                    start
                );
                continue;
            }

            let end = signature
                .find_closing(data, start)
                .unwrap_or_else(|| content_end(data, start));

            if end.saturating_sub(start) > MIN_BLOCK_LEN {
                return Some(ExtractedContentBlock::new(
                    signature.kind(),
                    start,
                    end,
                    marker,
                ));
            }

            tracing::debug!(
                "{} candidate at 0x{:08x} too short ({} bytes)",
                signature.kind(),
                start,
                end.saturating_sub(start)
            );
        }

        None
    }
}

impl Default for SignatureExtractor {
    fn default() -> Self {
        Self::web_assets()
    }
}

impl RecoveryStrategy for SignatureExtractor {
    fn name(&self) -> &str {
        "content-signature"
    }

    fn recover(&self, data: &[u8]) -> Vec<ExtractedContentBlock> {
        self.signatures
            .iter()
            .filter_map(|signature| self.recover_kind(data, signature))
            .collect()
    }
}

/// Returns the exclusive end of the content starting at `start`
///
/// Walks forward counting consecutive 0x00/0xFF bytes. Once the run reaches
/// `PADDING_RUN_LIMIT` the content ends where the run began. Padding that
/// runs into the end of the buffer is trimmed the same way.
pub fn content_end(data: &[u8], start: usize) -> usize {
    let Some(tail) = data.get(start..) else {
        return data.len();
    };

    let mut run = 0usize;
    for (i, &byte) in tail.iter().enumerate() {
        if byte == 0x00 || byte == 0xFF {
            run += 1;
            if run >= PADDING_RUN_LIMIT {
                return start + i + 1 - run;
            }
        } else {
            run = 0;
        }
    }

    data.len() - run
}

/// Quick presence check for web content anywhere in an image
///
/// Purely diagnostic: reports which kinds appear to be present, without
/// trying to bound them.
#[derive(Debug)]
pub struct ContentHints {
    pattern_matcher: Option<AhoCorasick>,
    /// Maps pattern index to the content kind it indicates
    pattern_map: Vec<ContentKind>,
}

impl ContentHints {
    pub fn new() -> Self {
        let patterns: [(&[u8], ContentKind); 6] = [
            (b"<!DOCTYPE html", ContentKind::Markup),
            (b"<html", ContentKind::Markup),
            (b"body {", ContentKind::Stylesheet),
            (b".css", ContentKind::Stylesheet),
            (b"function", ContentKind::Script),
            (b"const ", ContentKind::Script),
        ];

        Self {
            pattern_matcher: AhoCorasick::new(patterns.iter().map(|(p, _)| p)).ok(),
            pattern_map: patterns.iter().map(|(_, kind)| *kind).collect(),
        }
    }

    /// Kinds present in `data`, in markup, stylesheet, script order
    pub fn detect(&self, data: &[u8]) -> Vec<ContentKind> {
        let Some(matcher) = &self.pattern_matcher else {
            return Vec::new();
        };

        let mut seen = [false; 3];
        for mat in matcher.find_overlapping_iter(data) {
            let idx = kind_index(self.pattern_map[mat.pattern().as_usize()]);
            seen[idx] = true;
            if seen.iter().all(|&s| s) {
                break;
            }
        }

        [ContentKind::Markup, ContentKind::Stylesheet, ContentKind::Script]
            .into_iter()
            .filter(|kind| seen[kind_index(*kind)])
            .collect()
    }
}

impl Default for ContentHints {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_index(kind: ContentKind) -> usize {
    match kind {
        ContentKind::Markup => 0,
        ContentKind::Stylesheet => 1,
        ContentKind::Script => 2,
    }
}
