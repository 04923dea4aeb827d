//! Application layer
//!
//! Use cases that load images and orchestrate the domain services.

pub mod dto;
mod inspect_image;
mod locate_partition;

pub use inspect_image::InspectImageUseCase;
pub use locate_partition::{LocatePartitionUseCase, PartitionLookup};
