//! Network I/O functions
//!
//! Bridges Network to the Touchstone codec in both directions, carrying the
//! source format family through so re-encoded files keep their option line.

use std::path::Path;

use super::core::Network;
use crate::touchstone::{DecodeError, EncodeError, Touchstone};
use ndarray::{Array1, Array3};

impl Network {
    /// Read a network from a Touchstone file
    pub fn from_touchstone<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let ts = Touchstone::from_file(path)?;
        Ok(Self::from_touchstone_data(ts))
    }

    /// Read a network from Touchstone content
    pub fn from_touchstone_content(content: &str, nports: usize) -> Result<Self, DecodeError> {
        let ts = Touchstone::from_str_content(content, nports)?;
        Ok(Self::from_touchstone_data(ts))
    }

    fn from_touchstone_data(ts: Touchstone) -> Self {
        let nfreq = ts.nfreq();
        let nports = ts.nports;

        let s = Array3::from_shape_fn((nfreq, nports, nports), |(f, i, j)| ts.s[f][i][j]);
        let z0 = Array1::from_vec(ts.z0);

        Self {
            frequency: ts.frequency,
            s,
            z0,
            comments: ts.comments,
            format: ts.format,
        }
    }

    /// Write the network to a Touchstone file in its carried format family
    pub fn write_touchstone<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        self.to_touchstone().write(path)
    }

    /// Convert to the Touchstone data container
    pub fn to_touchstone(&self) -> Touchstone {
        let nports = self.nports();
        let nfreq = self.nfreq();

        let mut s = Vec::with_capacity(nfreq);
        for f_idx in 0..nfreq {
            let slice = self.s.index_axis(ndarray::Axis(0), f_idx);
            let matrix: Vec<Vec<num_complex::Complex64>> =
                slice.rows().into_iter().map(|row| row.to_vec()).collect();
            s.push(matrix);
        }

        Touchstone {
            nports,
            frequency: self.frequency.clone(),
            s,
            z0: self.z0.to_vec(),
            comments: self.comments.clone(),
            format: self.format,
        }
    }
}
