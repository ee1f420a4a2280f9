//! Batch runner
//!
//! Iterates a set of input files, applies one configured transform, writes
//! the results, and aggregates per-file outcomes. A single bad file never
//! aborts the batch; parameter validation happens before any file is touched.

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::network::Network;
use crate::touchstone::{DecodeError, EncodeError};

/// Batch-level errors
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("invalid gain value: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The transform a batch applies to every input file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformKind {
    /// Uniform gain (positive dB) or loss (negative dB) on every sample
    Scale { gain_db: f64 },
    /// 2-port flip: swap port 1 and port 2
    Flip,
}

/// Per-file result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    Success { output: PathBuf },
    Skipped { reason: String },
    Failed { reason: String },
}

/// Outcome for one input file, in batch order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub kind: OutcomeKind,
}

/// Aggregate result of a batch run, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::Success { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::Failed { .. }))
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    fn count(&self, pred: impl Fn(&OutcomeKind) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.kind)).count()
    }

    fn record(&mut self, input: &Path, kind: OutcomeKind) {
        match &kind {
            OutcomeKind::Success { output } => {
                info!(input = %input.display(), output = %output.display(), "processed")
            }
            OutcomeKind::Skipped { reason } => {
                info!(input = %input.display(), reason = %reason, "skipped")
            }
            OutcomeKind::Failed { reason } => {
                warn!(input = %input.display(), reason = %reason, "failed")
            }
        }
        self.outcomes.push(BatchOutcome {
            input: input.to_path_buf(),
            kind,
        });
    }
}

/// Apply a gain/loss to a single file
///
/// Single-file entry point: decode, scale, encode to the given output path.
/// Directories are not created here; the caller picks the destination.
pub fn apply_gain_or_loss(
    input: &Path,
    output: &Path,
    gain_db: f64,
) -> Result<(), BatchError> {
    validate_gain(gain_db)?;
    let network = Network::from_touchstone(input)?;
    network.scaled(gain_db).write_touchstone(output)?;
    Ok(())
}

/// Run one transform over a set of input files
///
/// Files are processed strictly in the given order; the outcome list keeps
/// that order. Per-file decode, directory, and encode failures are recorded
/// and the batch continues. Only an invalid parameter fails the whole call,
/// and that is checked before any file is opened.
pub fn run_batch(inputs: &[PathBuf], transform: TransformKind) -> Result<BatchSummary, BatchError> {
    if let TransformKind::Scale { gain_db } = transform {
        validate_gain(gain_db)?;
    }

    info!(files = inputs.len(), ?transform, "starting batch");

    let summary = match transform {
        TransformKind::Scale { gain_db } => run_scale(inputs, gain_db),
        TransformKind::Flip => run_flip(inputs),
    };

    info!(
        succeeded = summary.succeeded(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "batch finished"
    );

    Ok(summary)
}

fn run_scale(inputs: &[PathBuf], gain_db: f64) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for input in inputs {
        debug!(input = %input.display(), "processing");

        let network = match Network::from_touchstone(input) {
            Ok(n) => n,
            Err(e) => {
                summary.record(input, OutcomeKind::Failed { reason: e.to_string() });
                continue;
            }
        };

        let output = paths::scale_output_path(input, gain_db);
        write_output(&mut summary, input, &network.scaled(gain_db), output);
    }

    summary
}

fn run_flip(inputs: &[PathBuf]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    // The destination is resolved once per run, from the parent of the first
    // selected file, and is guaranteed fresh
    let swapped_dir = match inputs.first() {
        Some(first) => paths::unique_swapped_dir(&paths::parent_or_cwd(first)),
        None => return summary,
    };

    for input in inputs {
        debug!(input = %input.display(), "processing");

        let network = match Network::from_touchstone(input) {
            Ok(n) => n,
            Err(e) => {
                summary.record(input, OutcomeKind::Failed { reason: e.to_string() });
                continue;
            }
        };

        let flipped = match network.flipped() {
            Ok(n) => n,
            Err(e) => {
                summary.record(input, OutcomeKind::Skipped { reason: e.to_string() });
                continue;
            }
        };

        let output = paths::flip_output_path(&swapped_dir, input);
        write_output(&mut summary, input, &flipped, output);
    }

    summary
}

/// Create the destination directory if needed and encode the network.
/// Either step failing marks this file Failed without touching the batch.
fn write_output(summary: &mut BatchSummary, input: &Path, network: &Network, output: PathBuf) {
    if let Some(dir) = output.parent() {
        // Idempotent across files sharing a destination
        if let Err(e) = fs::create_dir_all(dir) {
            summary.record(
                input,
                OutcomeKind::Failed {
                    reason: format!("could not create {}: {}", dir.display(), e),
                },
            );
            return;
        }
    }

    match network.write_touchstone(&output) {
        Ok(()) => summary.record(input, OutcomeKind::Success { output }),
        Err(e) => summary.record(input, OutcomeKind::Failed { reason: e.to_string() }),
    }
}

fn validate_gain(gain_db: f64) -> Result<(), BatchError> {
    if gain_db.is_finite() {
        Ok(())
    } else {
        Err(BatchError::InvalidParameter(format!(
            "{gain_db} is not a finite number"
        )))
    }
}
