//! Encoding-aware text handling.

mod encoding;
mod substr;

pub use encoding::{char_count, Encoding};
pub use substr::{char_range, substring};
