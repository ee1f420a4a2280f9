//! Touchstone file I/O module
//!
//! Provides reading and writing of Touchstone v1 (.sNp) files.

pub mod parser;
pub mod writer;

pub use parser::{DecodeError, ParamFormat, Touchstone};
pub use writer::EncodeError;
