//! Output formats for compiled families.
pub mod inc;
pub mod json;

pub use inc::render_inc;
pub use json::TableSet;
