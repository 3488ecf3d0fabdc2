//! Compile Unicode character database files into sorted, range-compressed
//! lookup tables.
//!
//! The pipeline per family is: parse records → merge into maximal runs →
//! fill gaps from a default policy (categorical families) or compress into
//! affine runs (case families) → verify → emit.
pub mod affine;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod family;
pub mod merge;
pub mod names;
pub mod path_de;
pub mod pipeline;
pub mod property;
pub mod record;
pub mod report;
pub mod resolve;
pub mod source;
pub mod table;

pub use error::CompileError;
pub use family::{CompiledFamily, CompiledTable};
