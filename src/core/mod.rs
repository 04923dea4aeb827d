//! Core types shared by every layer

mod error;
mod image;

pub use error::{FlashError, Result};
pub use image::{find_from, ByteImage};
