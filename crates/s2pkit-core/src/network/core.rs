//! Core Network struct and constructors

use ndarray::{Array1, Array3};
use num_complex::Complex64;
use thiserror::Error;

use crate::frequency::Frequency;
use crate::touchstone::ParamFormat;

/// Network construction errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("S-matrix block is {sfreq}x{rows}x{cols} but {nfreq} frequency points were given")]
    ShapeMismatch {
        sfreq: usize,
        rows: usize,
        cols: usize,
        nfreq: usize,
    },

    #[error("z0 has {z0_len} entries for a {nports}-port network")]
    ImpedanceMismatch { z0_len: usize, nports: usize },
}

/// An N-port electrical network
#[derive(Debug, Clone)]
pub struct Network {
    /// Frequency data
    pub frequency: Frequency,
    /// S-parameter data [nfreq, nports, nports]
    pub s: Array3<Complex64>,
    /// Reference impedance (per port)
    pub z0: Array1<f64>,
    /// Comments carried over from the source file
    pub comments: Vec<String>,
    /// Format family the source file used; encode reproduces it
    pub format: ParamFormat,
}

impl Network {
    /// Create a new Network from S-parameters
    pub fn new(
        frequency: Frequency,
        s: Array3<Complex64>,
        z0: Array1<f64>,
    ) -> Result<Self, NetworkError> {
        let shape = s.shape();
        let (sfreq, rows, cols) = (shape[0], shape[1], shape[2]);
        if rows != cols || sfreq != frequency.npoints() {
            return Err(NetworkError::ShapeMismatch {
                sfreq,
                rows,
                cols,
                nfreq: frequency.npoints(),
            });
        }
        if z0.len() != rows {
            return Err(NetworkError::ImpedanceMismatch {
                z0_len: z0.len(),
                nports: rows,
            });
        }

        Ok(Self {
            frequency,
            s,
            z0,
            comments: Vec::new(),
            format: ParamFormat::default(),
        })
    }

    /// Get the number of ports
    #[inline]
    pub fn nports(&self) -> usize {
        self.s.shape()[1]
    }

    /// Get the number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.s.shape()[0]
    }
}
