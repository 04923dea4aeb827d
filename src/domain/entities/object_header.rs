//! Filesystem object header entity
//!
//! Represents one SPIFFS object header recovered from an image, together
//! with where it was found and where its payload lives.

use serde::Serialize;
use std::ops::Range;

/// SPIFFS object header magic, stored little-endian
pub const SPIFFS_MAGIC: u32 = 0x2009_0315;
/// Size of the fixed header that precedes the name field
pub const OBJECT_HEADER_LEN: usize = 32;

/// A decoded object header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesystemObjectHeader {
    /// Byte offset of the header in the image
    pub header_offset: usize,
    /// Stride the header was discovered at
    pub stride: usize,
    pub magic: u32,
    pub object_type: u8,
    pub object_id: u16,
    /// Declared length of the payload
    pub payload_size: u32,
    /// Object name as stored, decoded lossily
    pub name: String,
    /// First byte after the header and the name field
    pub payload_offset: usize,
}

impl FilesystemObjectHeader {
    /// Exclusive payload end, `None` if it does not fit in `usize`
    pub fn payload_end(&self) -> Option<usize> {
        self.payload_offset.checked_add(self.payload_size as usize)
    }

    /// Payload byte range, if it lies entirely inside an image of `image_len` bytes
    pub fn payload_range(&self, image_len: usize) -> Option<Range<usize>> {
        match self.payload_end() {
            Some(end) if end <= image_len => Some(self.payload_offset..end),
            _ => None,
        }
    }

    /// Name with leading path separators removed, suitable for joining under a directory
    pub fn relative_name(&self) -> &str {
        self.name.trim_start_matches(['/', '\\'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, payload_offset: usize, payload_size: u32) -> FilesystemObjectHeader {
        FilesystemObjectHeader {
            header_offset: 0,
            stride: 256,
            magic: SPIFFS_MAGIC,
            object_type: 1,
            object_id: 7,
            payload_size,
            name: name.to_string(),
            payload_offset,
        }
    }

    #[test]
    fn test_payload_range_in_bounds() {
        let h = header("/index.html", 43, 100);
        assert_eq!(h.payload_range(143), Some(43..143));
        assert_eq!(h.payload_range(200), Some(43..143));
    }

    #[test]
    fn test_payload_range_out_of_bounds() {
        let h = header("/index.html", 43, 100);
        assert_eq!(h.payload_range(142), None);
        assert_eq!(h.payload_range(0), None);
    }

    #[test]
    fn test_payload_end_overflow() {
        let h = header("/big", usize::MAX - 1, 10);
        assert_eq!(h.payload_end(), None);
        assert_eq!(h.payload_range(usize::MAX), None);
    }

    #[test]
    fn test_relative_name_strips_separators() {
        assert_eq!(header("/www/app.js", 0, 0).relative_name(), "www/app.js");
        assert_eq!(header("//\\style.css", 0, 0).relative_name(), "style.css");
        assert_eq!(header("plain.txt", 0, 0).relative_name(), "plain.txt");
    }
}
