//! Prelude module for the bikram_sambat crate.
//!
//! Re-exports commonly used derive macros from derive_more.

pub use derive_more::{Display, From, Into};
