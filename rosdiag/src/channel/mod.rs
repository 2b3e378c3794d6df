//! Channel layer: output collection for exec channels.
//!
//! This module handles turning raw SSH channel data into clean text,
//! including ANSI stripping and line-ending normalization.

mod buffer;

pub use buffer::{ExecOutput, OutputBuffer};
