//! Filesystem object scanner
//!
//! Walks a SPIFFS image at a series of candidate page strides looking for
//! object headers. The on-flash page size is not recorded anywhere the
//! scanner can trust, so strides are tried smallest first and the first
//! stride that produces any header is taken as the real one.
//!
//! Header layout, relative to the header offset:
//!
//! ```text
//! 0x00  magic     u32 LE (0x20090315)
//! 0x04  type      u8
//! 0x05  id        u16 LE
//! 0x08  size      u32 LE
//! 0x0C  name_len  u8
//! 0x20  name      name_len bytes
//! ```

use crate::domain::entities::{FilesystemObjectHeader, OBJECT_HEADER_LEN, SPIFFS_MAGIC};
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::Cursor;

/// Page strides tried in order
pub const DEFAULT_STRIDES: [usize; 4] = [256, 512, 1024, 4096];
/// Bytes inspected by the blank-image pre-check
pub const CORRUPTION_PROBE_LEN: usize = 1024;

/// Scanner tuning knobs
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Strides tried in order; the first one producing headers wins
    pub strides: Vec<usize>,
    /// Expected header magic
    pub magic: u32,
    /// Leading bytes that must not all be zero
    pub probe_len: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            strides: DEFAULT_STRIDES.to_vec(),
            magic: SPIFFS_MAGIC,
            probe_len: CORRUPTION_PROBE_LEN,
        }
    }
}

impl ScannerConfig {
    /// Replaces the stride list
    pub fn with_strides(mut self, strides: Vec<usize>) -> Self {
        self.strides = strides;
        self
    }
}

/// Result of scanning an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Leading bytes are all zero; no stride was scanned
    Corrupted,
    /// Every stride was scanned and none produced a header
    NoObjects,
    /// Headers found at `stride`
    Found {
        stride: usize,
        headers: Vec<FilesystemObjectHeader>,
    },
}

impl ScanOutcome {
    pub fn headers(&self) -> &[FilesystemObjectHeader] {
        match self {
            ScanOutcome::Found { headers, .. } => headers,
            _ => &[],
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, ScanOutcome::Corrupted)
    }
}

/// Scans filesystem images for object headers
#[derive(Debug, Clone, Default)]
pub struct ObjectScanner {
    config: ScannerConfig,
}

impl ObjectScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Runs the pre-check and then each stride until one yields headers
    pub fn scan(&self, data: &[u8]) -> ScanOutcome {
        if is_blank(data, self.config.probe_len) {
            tracing::warn!(
                "Image appears empty: first {} bytes are zero",
                self.config.probe_len.min(data.len())
            );
            return ScanOutcome::Corrupted;
        }

        for &stride in &self.config.strides {
            if stride == 0 {
                tracing::warn!("Ignoring zero stride");
                continue;
            }

            let headers = self.scan_stride(data, stride);
            tracing::debug!("Stride {}: {} headers", stride, headers.len());

            if !headers.is_empty() {
                return ScanOutcome::Found { stride, headers };
            }
        }

        ScanOutcome::NoObjects
    }

    /// Collects every valid header at offsets that are multiples of `stride`
    pub fn scan_stride(&self, data: &[u8], stride: usize) -> Vec<FilesystemObjectHeader> {
        let mut headers = Vec::new();
        if stride == 0 {
            return headers;
        }

        let magic = self.config.magic.to_le_bytes();
        let mut offset = 0usize;

        while offset + OBJECT_HEADER_LEN < data.len() {
            if data[offset..offset + 4] == magic {
                if let Some(header) = self.decode_header(data, offset, stride) {
                    tracing::debug!(
                        "Found {} at 0x{:08x} (stride {})",
                        header.name,
                        offset,
                        stride
                    );
                    headers.push(header);
                }
            }

            offset = match offset.checked_add(stride) {
                Some(next) => next,
                None => break,
            };
        }

        headers
    }

    /// Decodes a header at `offset`, returning `None` for anything malformed
    pub fn decode_header(
        &self,
        data: &[u8],
        offset: usize,
        stride: usize,
    ) -> Option<FilesystemObjectHeader> {
        let fixed = data.get(offset..offset.checked_add(OBJECT_HEADER_LEN)?)?;
        let mut cursor = Cursor::new(fixed);

        let magic = cursor.read_u32::<LittleEndian>().ok()?;
        if magic != self.config.magic {
            return None;
        }
        let object_type = cursor.read_u8().ok()?;
        let object_id = cursor.read_u16::<LittleEndian>().ok()?;

        cursor.set_position(8);
        let payload_size = cursor.read_u32::<LittleEndian>().ok()?;
        let name_len = cursor.read_u8().ok()? as usize;

        if name_len == 0 {
            return None;
        }

        let name_start = offset + OBJECT_HEADER_LEN;
        let name_end = name_start.checked_add(name_len)?;
        let raw_name = data.get(name_start..name_end)?;

        let trimmed = match raw_name.iter().rposition(|&b| b != 0) {
            Some(last) => &raw_name[..=last],
            None => return None,
        };
        let name = String::from_utf8_lossy(trimmed).into_owned();

        Some(FilesystemObjectHeader {
            header_offset: offset,
            stride,
            magic,
            object_type,
            object_id,
            payload_size,
            name,
            payload_offset: name_end,
        })
    }
}

/// Whether the first `probe_len` bytes (or the whole buffer) are zero
pub fn is_blank(data: &[u8], probe_len: usize) -> bool {
    data[..probe_len.min(data.len())].iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_header(image: &mut [u8], offset: usize, name: &[u8], payload: &[u8]) {
        image[offset..offset + 4].copy_from_slice(&SPIFFS_MAGIC.to_le_bytes());
        image[offset + 4] = 1;
        image[offset + 5..offset + 7].copy_from_slice(&0x0042u16.to_le_bytes());
        image[offset + 8..offset + 12].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        image[offset + 12] = name.len() as u8;
        let name_start = offset + OBJECT_HEADER_LEN;
        image[name_start..name_start + name.len()].copy_from_slice(name);
        let data_start = name_start + name.len();
        image[data_start..data_start + payload.len()].copy_from_slice(payload);
    }

    fn filled(len: usize) -> Vec<u8> {
        vec![0xFF; len]
    }

    #[test]
    fn test_decode_header_fields() {
        let mut image = filled(1024);
        write_header(&mut image, 256, b"/index.html", b"<p>hi</p>");

        let scanner = ObjectScanner::default();
        let header = scanner.decode_header(&image, 256, 256).unwrap();
        assert_eq!(header.magic, SPIFFS_MAGIC);
        assert_eq!(header.object_type, 1);
        assert_eq!(header.object_id, 0x42);
        assert_eq!(header.payload_size, 9);
        assert_eq!(header.name, "/index.html");
        assert_eq!(header.payload_offset, 256 + 32 + 11);
    }

    #[test]
    fn test_decode_rejects_zero_name_len() {
        let mut image = filled(512);
        write_header(&mut image, 0, b"", b"");
        let scanner = ObjectScanner::default();
        assert!(scanner.decode_header(&image, 0, 256).is_none());
    }

    #[test]
    fn test_decode_rejects_name_past_end() {
        let mut image = filled(64);
        image[0..4].copy_from_slice(&SPIFFS_MAGIC.to_le_bytes());
        image[12] = 40;
        let scanner = ObjectScanner::default();
        assert!(scanner.decode_header(&image, 0, 256).is_none());
    }

    #[test]
    fn test_decode_rejects_truncated_fixed_header() {
        let image = SPIFFS_MAGIC.to_le_bytes().to_vec();
        let scanner = ObjectScanner::default();
        assert!(scanner.decode_header(&image, 0, 256).is_none());
    }

    #[test]
    fn test_decode_trims_nul_padding() {
        let mut image = filled(512);
        write_header(&mut image, 0, b"/a.txt\0\0", b"abc");
        let scanner = ObjectScanner::default();
        assert_eq!(scanner.decode_header(&image, 0, 256).unwrap().name, "/a.txt");

        write_header(&mut image, 256, b"\0\0\0", b"abc");
        assert!(scanner.decode_header(&image, 256, 256).is_none());
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let mut image = filled(512);
        write_header(&mut image, 0, b"/f\xFFx", b"abc");
        let scanner = ObjectScanner::default();
        assert_eq!(scanner.decode_header(&image, 0, 256).unwrap().name, "/f\u{FFFD}x");
    }

    #[test]
    fn test_blank_probe() {
        assert!(is_blank(&[], CORRUPTION_PROBE_LEN));
        assert!(is_blank(&[0u8; 10], CORRUPTION_PROBE_LEN));

        let mut data = vec![0u8; 2048];
        assert!(is_blank(&data, CORRUPTION_PROBE_LEN));
        data[1500] = 1;
        assert!(is_blank(&data, CORRUPTION_PROBE_LEN));
        data[1023] = 1;
        assert!(!is_blank(&data, CORRUPTION_PROBE_LEN));
    }

    #[test]
    fn test_first_stride_wins() {
        let mut image = filled(8192);
        write_header(&mut image, 512, b"/a.txt", b"aaaa");
        write_header(&mut image, 4096, b"/b.txt", b"bbbb");

        let outcome = ObjectScanner::default().scan(&image);
        match outcome {
            ScanOutcome::Found { stride, headers } => {
                assert_eq!(stride, 256);
                assert_eq!(headers.len(), 2);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_coarser_stride_used_when_finer_misses() {
        let mut image = filled(4096);
        write_header(&mut image, 0, b"/only.txt", b"data");

        let scanner = ObjectScanner::new(ScannerConfig::default().with_strides(vec![0, 4096]));
        match scanner.scan(&image) {
            ScanOutcome::Found { stride, headers } => {
                assert_eq!(stride, 4096);
                assert_eq!(headers[0].name, "/only.txt");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_no_objects() {
        let image = filled(4096);
        assert_eq!(ObjectScanner::default().scan(&image), ScanOutcome::NoObjects);
    }

    #[test]
    fn test_header_at_tail_needs_room_for_name() {
        let mut image = filled(256 + 33);
        write_header(&mut image, 256, b"x", b"");
        let headers = ObjectScanner::default().scan_stride(&image, 256);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].payload_offset, image.len());
    }
}
