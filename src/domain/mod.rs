//! Domain layer - Core business logic
//!
//! Entities, repository traits and the parsing services. Nothing in here
//! touches the filesystem directly.

pub mod entities;
pub mod repositories;
pub mod services;
