//! Platform definitions for vendor-specific output conventions.

mod definition;
pub mod routeros;

pub use definition::PlatformDefinition;
