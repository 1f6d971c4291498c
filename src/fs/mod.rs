//! Mapping request paths onto the served directory tree.
//!
//! - **`resolver`**: the `ResourceResolver` seam and its filesystem implementation
//! - **`listing`**: HTML rendering for directory requests

pub mod listing;
pub mod resolver;

pub use resolver::{ByteSource, FileResolver, Resource, ResourceBody, ResourceResolver};
