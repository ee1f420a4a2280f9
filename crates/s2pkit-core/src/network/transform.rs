//! Network transforms
//!
//! The two supported operations: uniform gain/loss scaling and the 2-port
//! port flip. Both return a new Network and leave the input untouched.

use ndarray::{Array1, Array3};
use num_complex::Complex64;
use thiserror::Error;

use super::core::Network;

/// Transform errors
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("not a 2-port network: flip requires 2 ports, found {0}")]
    UnsupportedPortCount(usize),
}

impl Network {
    /// Apply a uniform gain (positive dB) or loss (negative dB) to every
    /// S-parameter sample.
    ///
    /// The linear factor is `10^(gain_db / 20)`, which is always positive;
    /// gain versus loss is carried by the sign of `gain_db`. This is a
    /// frequency-flat bookkeeping correction, not a device model. Valid for
    /// any port count.
    pub fn scaled(&self, gain_db: f64) -> Network {
        let factor = 10.0_f64.powf(gain_db / 20.0);
        let s = self.s.mapv(|c| c * factor);

        Network {
            frequency: self.frequency.clone(),
            s,
            z0: self.z0.clone(),
            comments: self.comments.clone(),
            format: self.format,
        }
    }

    /// Flip the ports of a 2-port network (swap port 1 and port 2)
    ///
    /// Swaps S11 with S22 and S12 with S21 at every frequency, and swaps the
    /// per-port reference impedances in lockstep. A pure permutation: no
    /// floating-point arithmetic, so flipping twice is bit-exact.
    pub fn flipped(&self) -> Result<Network, TransformError> {
        if self.nports() != 2 {
            return Err(TransformError::UnsupportedPortCount(self.nports()));
        }

        let nfreq = self.nfreq();
        let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));

        for f in 0..nfreq {
            // new[i,j] = old[1-i, 1-j]
            s[[f, 0, 0]] = self.s[[f, 1, 1]];
            s[[f, 0, 1]] = self.s[[f, 1, 0]];
            s[[f, 1, 0]] = self.s[[f, 0, 1]];
            s[[f, 1, 1]] = self.s[[f, 0, 0]];
        }

        let z0 = Array1::from_vec(vec![self.z0[1], self.z0[0]]);

        Ok(Network {
            frequency: self.frequency.clone(),
            s,
            z0,
            comments: self.comments.clone(),
            format: self.format,
        })
    }
}
