//! Network module - N-port network representation
//!
//! Provides the core Network struct, Touchstone I/O bridging, and the two
//! supported transforms (uniform scaling and 2-port flip).

mod core;
mod io;
mod transform;

pub use core::{Network, NetworkError};
pub use transform::TransformError;
