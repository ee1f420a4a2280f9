//! Touchstone file writer
//!
//! Writes S-parameter data to Touchstone v1 format files. The output file is
//! staged in a temporary file next to the destination and renamed into place,
//! so a failed write never disturbs an existing output.

use num_complex::Complex64;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::parser::{ParamFormat, Touchstone};

/// Touchstone encode errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S-matrix at frequency index {index} is {rows}x{cols}, expected {nports}x{nports}")]
    ShapeMismatch {
        index: usize,
        rows: usize,
        cols: usize,
        nports: usize,
    },
}

impl fmt::Display for Touchstone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        let mut writer = Cursor::new(&mut buf);
        if self.write_to(&mut writer).is_err() {
            return Err(fmt::Error);
        }
        write!(f, "{}", String::from_utf8_lossy(&buf))
    }
}

impl Touchstone {
    /// Write to a Touchstone file, replacing any existing file atomically
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        let path = path.as_ref();
        self.check_shape()?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write_to(tmp.as_file_mut())?;
        tmp.persist(path).map_err(|e| EncodeError::Io(e.error))?;
        Ok(())
    }

    /// Write to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.check_shape()?;

        for comment in &self.comments {
            writeln!(writer, "! {}", comment)?;
        }

        writeln!(
            writer,
            "# {} S {} R {}",
            self.frequency.unit().as_str(),
            self.format.as_str(),
            self.z0.first().copied().unwrap_or(50.0)
        )?;

        let f_scaled = self.frequency.f_scaled();

        for (freq_idx, freq) in f_scaled.iter().enumerate() {
            let s_matrix = &self.s[freq_idx];

            write!(writer, "{:>15.9}", freq)?;

            if self.nports == 2 {
                // v1 2-port column order: S11, S21, S12, S22
                let order = [(0, 0), (1, 0), (0, 1), (1, 1)];
                for (i, j) in order {
                    let (v1, v2) = self.format_complex(s_matrix[i][j]);
                    write!(writer, " {:>15.9} {:>15.9}", v1, v2)?;
                }
            } else {
                for row in s_matrix.iter() {
                    for c in row.iter() {
                        let (v1, v2) = self.format_complex(*c);
                        write!(writer, " {:>15.9} {:>15.9}", v1, v2)?;
                    }
                }
            }

            writeln!(writer)?;
        }

        Ok(())
    }

    fn check_shape(&self) -> Result<(), EncodeError> {
        for (index, m) in self.s.iter().enumerate() {
            let rows = m.len();
            let cols = m.first().map_or(0, |r| r.len());
            if rows != self.nports || m.iter().any(|r| r.len() != self.nports) {
                return Err(EncodeError::ShapeMismatch {
                    index,
                    rows,
                    cols,
                    nports: self.nports,
                });
            }
        }
        Ok(())
    }

    fn format_complex(&self, c: Complex64) -> (f64, f64) {
        match self.format {
            ParamFormat::RI => (c.re, c.im),
            ParamFormat::MA => (c.norm(), c.arg().to_degrees()),
            ParamFormat::DB => (20.0 * c.norm().log10(), c.arg().to_degrees()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit};

    fn one_point_ts(format: ParamFormat) -> Touchstone {
        Touchstone {
            nports: 2,
            frequency: Frequency::from_hz(vec![1e9], FrequencyUnit::Hz),
            s: vec![vec![
                vec![Complex64::new(0.1, 0.0), Complex64::new(0.9, 0.0)],
                vec![Complex64::new(0.9, 0.0), Complex64::new(0.1, 0.0)],
            ]],
            z0: vec![50.0, 50.0],
            comments: vec![],
            format,
        }
    }

    #[test]
    fn test_option_line_reproduces_format() {
        let text = one_point_ts(ParamFormat::DB).to_string();
        assert!(text.starts_with("# Hz S DB R 50"));

        let text = one_point_ts(ParamFormat::RI).to_string();
        assert!(text.starts_with("# Hz S RI R 50"));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut ts = one_point_ts(ParamFormat::RI);
        ts.s[0].pop();
        let err = ts.write_to(&mut Vec::new()).unwrap_err();
        assert!(matches!(err, EncodeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_display_round_trips() {
        let ts = one_point_ts(ParamFormat::RI);
        let text = ts.to_string();
        let back = Touchstone::from_str_content(&text, 2).unwrap();
        assert_eq!(back.nfreq(), 1);
        assert!((back.s[0][1][0].re - 0.9).abs() < 1e-9);
    }
}
