//! s2pkit-core: Touchstone (.sNp) batch-transform library
//!
//! Decodes 2-port RF network files in the Touchstone text format, applies a
//! uniform gain/loss factor or a port flip, and writes the result back out,
//! batching over many files with per-file outcome reporting.
//!
//! ## Modules
//!
//! - `frequency` - Frequency vector with display unit
//! - `touchstone` - Touchstone file I/O
//! - `network` - Network representation and transforms
//! - `batch` - Output-path policies and the batch runner

pub mod batch;
pub mod frequency;
pub mod network;
pub mod touchstone;

pub use batch::{apply_gain_or_loss, run_batch, BatchOutcome, BatchSummary, TransformKind};
pub use frequency::Frequency;
pub use network::Network;
