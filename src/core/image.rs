//! Read-only byte view over a flash dump
//!
//! A `ByteImage` is either an owned buffer (tests, stdin, synthetic data)
//! or a read-only memory map of a file on disk. Parsers only ever see the
//! resulting `&[u8]`.

use super::error::{FlashError, Result};
use bytes::Bytes;
use memchr::memmem;
use memmap2::Mmap;
use std::fs::OpenOptions;
use std::ops::Deref;
use std::path::{Path, PathBuf};

enum Backing {
    Owned(Bytes),
    Mapped(Mmap),
}

/// Immutable view over the raw bytes of a partition table or filesystem image
pub struct ByteImage {
    backing: Backing,
    source: Option<PathBuf>,
}

impl ByteImage {
    /// Wraps an in-memory buffer
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            backing: Backing::Owned(data.into()),
            source: None,
        }
    }

    /// Opens a dump file and maps it read-only
    ///
    /// Zero-length files cannot be mapped on every platform, so they are
    /// represented as an empty owned buffer instead.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(FlashError::InputNotFound(path.display().to_string()));
        }

        let file = OpenOptions::new().read(true).open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                FlashError::PermissionDenied(path.display().to_string())
            } else {
                FlashError::Io(e)
            }
        })?;

        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(FlashError::NotAFile(path.display().to_string()));
        }

        let backing = if metadata.len() == 0 {
            Backing::Owned(Bytes::new())
        } else {
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| FlashError::MapFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            #[cfg(unix)]
            {
                let _ = mmap.advise(memmap2::Advice::Sequential);
            }

            Backing::Mapped(mmap)
        };

        tracing::debug!("Loaded {} ({} bytes)", path.display(), metadata.len());

        Ok(Self {
            backing,
            source: Some(path.to_path_buf()),
        })
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match &self.backing {
            Backing::Owned(bytes) => bytes,
            Backing::Mapped(mmap) => mmap,
        }
    }

    /// Returns at most the first `len` bytes
    #[inline]
    pub fn head(&self, len: usize) -> &[u8] {
        let data = self.as_slice();
        &data[..len.min(data.len())]
    }
}

impl Deref for ByteImage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteImage {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for ByteImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteImage")
            .field("len", &self.len())
            .field("source", &self.source)
            .finish()
    }
}

/// Finds the first occurrence of `needle` in `haystack` at or after `from`
pub fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let tail = haystack.get(from..)?;
    memmem::find(tail, needle).map(|pos| from + pos)
}
