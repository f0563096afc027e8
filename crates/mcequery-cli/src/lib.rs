//! mcequery CLI library.
//!
//! Exposes the argument, input and output layers for testing. The entry
//! point is the `mcequery` binary.

pub mod cli;
pub mod input;
pub mod metadata;
pub mod output;

pub use cli::Args;
