//! Data models for the chata backend.
//!
//! Field names follow the website's JSON contract (camelCase).

mod booking;
mod content;
mod language;
mod upload;

pub use booking::*;
pub use content::*;
pub use language::*;
pub use upload::*;
