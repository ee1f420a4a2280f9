//! Touchstone file parser
//!
//! Implements parsing of Touchstone v1 format files. The port count comes
//! from the file extension (.s1p, .s2p, ...); for 2-port files the v1 column
//! order is S11, S21, S12, S22.

use num_complex::Complex64;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use crate::frequency::{Frequency, FrequencyUnit};

/// Touchstone decode errors
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid option line: {0}")]
    InvalidOption(String),

    #[error("Invalid file extension: expected .sNp format")]
    InvalidExtension,

    #[error("Non-increasing frequency at line {line}: {freq} Hz follows {prev} Hz")]
    NonIncreasingFrequency { line: usize, freq: f64, prev: f64 },

    #[error("File contains no frequency points")]
    Empty,
}

/// S-parameter data format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamFormat {
    RI, // Real-Imaginary
    MA, // Magnitude-Angle (degrees)
    #[default]
    DB, // dB-Angle (degrees)
}

impl ParamFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RI" => Some(ParamFormat::RI),
            "MA" => Some(ParamFormat::MA),
            "DB" => Some(ParamFormat::DB),
            _ => None,
        }
    }

    /// Option-line token for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamFormat::RI => "RI",
            ParamFormat::MA => "MA",
            ParamFormat::DB => "DB",
        }
    }
}

/// Touchstone file data container
#[derive(Debug, Clone)]
pub struct Touchstone {
    /// Number of ports
    pub nports: usize,
    /// Frequency data
    pub frequency: Frequency,
    /// S-parameter matrices: [nfreq][nports][nports]
    pub s: Vec<Vec<Vec<Complex64>>>,
    /// Reference impedance (per port)
    pub z0: Vec<f64>,
    /// Comments from the file
    pub comments: Vec<String>,
    /// Format the data was stored in
    pub format: ParamFormat,
}

impl Touchstone {
    /// Parse a Touchstone file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(DecodeError::InvalidExtension)?;
        let nports = Self::parse_extension(ext)?;

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        Self::parse(reader, nports)
    }

    /// Parse from string content
    pub fn from_str_content(content: &str, nports: usize) -> Result<Self, DecodeError> {
        let cursor = std::io::Cursor::new(content);
        Self::parse(cursor, nports)
    }

    /// Parse extension to get number of ports
    fn parse_extension(ext: &str) -> Result<usize, DecodeError> {
        let ext_lower = ext.to_lowercase();
        if ext_lower.starts_with('s') && ext_lower.ends_with('p') {
            let num_str = &ext_lower[1..ext_lower.len() - 1];
            num_str
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or(DecodeError::InvalidExtension)
        } else {
            Err(DecodeError::InvalidExtension)
        }
    }

    /// Parse from a reader
    fn parse<R: BufRead>(reader: R, nports: usize) -> Result<Self, DecodeError> {
        let mut state = ParserState::new(nports);

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let lineno = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            // Full-line comment
            if let Some(rest) = trimmed.strip_prefix('!') {
                state.comments.push(rest.trim().to_string());
                continue;
            }

            // Option line; only the first one counts
            if trimmed.starts_with('#') {
                if !state.option_parsed {
                    state.parse_option_line(trimmed)?;
                }
                continue;
            }

            state.parse_data_line(trimmed, lineno)?;
        }

        state.finalize()
    }

    /// Parse the option line (`# Hz S RI R 50`)
    pub fn parse_option_line(
        line: &str,
    ) -> Result<(FrequencyUnit, ParamFormat, f64), DecodeError> {
        let parts: Vec<&str> = line[1..].split_whitespace().collect();

        let mut freq_unit = FrequencyUnit::Hz;
        let mut format = ParamFormat::DB;
        let mut z0 = 50.0;

        let mut i = 0;
        while i < parts.len() {
            let part = parts[i].to_uppercase();

            if let Some(unit) = FrequencyUnit::parse(&part) {
                freq_unit = unit;
            } else if let Some(fmt) = ParamFormat::parse(&part) {
                format = fmt;
            } else if part == "S" {
                // Parameter type; only S-parameters are supported
            } else if part == "R" {
                let r = parts
                    .get(i + 1)
                    .and_then(|t| t.parse::<f64>().ok())
                    .ok_or_else(|| {
                        DecodeError::InvalidOption(format!("missing impedance after R: {line}"))
                    })?;
                z0 = r;
                i += 1;
            } else {
                return Err(DecodeError::InvalidOption(format!(
                    "unrecognized token '{}' in option line: {line}",
                    parts[i]
                )));
            }

            i += 1;
        }

        Ok((freq_unit, format, z0))
    }

    /// Get the number of frequency points
    pub fn nfreq(&self) -> usize {
        self.s.len()
    }
}

/// Internal parser state
struct ParserState {
    nports: usize,
    freq_unit: FrequencyUnit,
    format: ParamFormat,
    z0: f64,
    comments: Vec<String>,
    option_parsed: bool,

    // Data accumulation; v1 wraps long rows across physical lines, so values
    // buffer here until a full frequency point is available
    frequencies: Vec<f64>,
    s_data: Vec<Vec<Vec<Complex64>>>,
    pending: Vec<f64>,
    last_data_line: usize,
}

impl ParserState {
    fn new(nports: usize) -> Self {
        Self {
            nports,
            freq_unit: FrequencyUnit::Hz,
            format: ParamFormat::DB,
            z0: 50.0,
            comments: Vec::new(),
            option_parsed: false,
            frequencies: Vec::new(),
            s_data: Vec::new(),
            pending: Vec::new(),
            last_data_line: 0,
        }
    }

    fn parse_option_line(&mut self, line: &str) -> Result<(), DecodeError> {
        // Data already converted with the default unit/format would be wrong
        if !self.frequencies.is_empty() || !self.pending.is_empty() {
            return Err(DecodeError::InvalidOption(format!(
                "option line after data: {line}"
            )));
        }
        let (u, f, z) = Touchstone::parse_option_line(line)?;
        self.freq_unit = u;
        self.format = f;
        self.z0 = z;
        self.option_parsed = true;
        Ok(())
    }

    fn parse_data_line(&mut self, line: &str, lineno: usize) -> Result<(), DecodeError> {
        // Trailing comment on a data line
        let clean_line = match line.find('!') {
            Some(idx) => &line[..idx],
            None => line,
        };

        self.last_data_line = lineno;

        for token in clean_line.split_whitespace() {
            let val = token.parse::<f64>().map_err(|_| DecodeError::Parse {
                line: lineno,
                message: format!("expected a number, found '{token}'"),
            })?;
            self.pending.push(val);
        }

        self.drain_points(lineno)
    }

    /// Pull complete frequency points out of the pending buffer
    fn drain_points(&mut self, lineno: usize) -> Result<(), DecodeError> {
        let values_per_point = 1 + 2 * self.nports * self.nports;

        while self.pending.len() >= values_per_point {
            let freq = self.pending[0] * self.freq_unit.multiplier();
            if let Some(&prev) = self.frequencies.last() {
                if freq <= prev {
                    return Err(DecodeError::NonIncreasingFrequency {
                        line: lineno,
                        freq,
                        prev,
                    });
                }
            }
            self.frequencies.push(freq);

            let mut s_matrix =
                vec![vec![Complex64::new(0.0, 0.0); self.nports]; self.nports];
            let mut idx = 1;
            for i in 0..self.nports {
                for j in 0..self.nports {
                    let (v1, v2) = (self.pending[idx], self.pending[idx + 1]);
                    idx += 2;
                    let c = self.parse_complex_val(v1, v2);

                    // v1 2-port column order is S11 S21 S12 S22, not row-major
                    let (r, col) = if self.nports == 2 { (j, i) } else { (i, j) };
                    s_matrix[r][col] = c;
                }
            }

            self.s_data.push(s_matrix);
            self.pending.drain(0..values_per_point);
        }
        Ok(())
    }

    fn parse_complex_val(&self, v1: f64, v2: f64) -> Complex64 {
        match self.format {
            ParamFormat::RI => Complex64::new(v1, v2),
            ParamFormat::MA => {
                let rad = v2.to_radians();
                Complex64::from_polar(v1, rad)
            }
            ParamFormat::DB => {
                let mag = 10.0_f64.powf(v1 / 20.0);
                let rad = v2.to_radians();
                Complex64::from_polar(mag, rad)
            }
        }
    }

    fn finalize(self) -> Result<Touchstone, DecodeError> {
        if !self.pending.is_empty() {
            return Err(DecodeError::Parse {
                line: self.last_data_line,
                message: format!(
                    "trailing data: {} leftover value(s) do not form a complete \
                     frequency point for a {}-port network",
                    self.pending.len(),
                    self.nports
                ),
            });
        }
        if self.frequencies.is_empty() {
            return Err(DecodeError::Empty);
        }

        let frequency = Frequency::from_hz(self.frequencies, self.freq_unit);

        Ok(Touchstone {
            nports: self.nports,
            frequency,
            s: self.s_data,
            z0: vec![self.z0; self.nports],
            comments: self.comments,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_extension() {
        assert_eq!(Touchstone::parse_extension("s1p").unwrap(), 1);
        assert_eq!(Touchstone::parse_extension("s2p").unwrap(), 2);
        assert_eq!(Touchstone::parse_extension("S4P").unwrap(), 4);
        assert!(Touchstone::parse_extension("txt").is_err());
        assert!(Touchstone::parse_extension("s0p").is_err());
    }

    #[test]
    fn test_parse_option_line() {
        let (unit, format, z0) = Touchstone::parse_option_line("# GHz S RI R 50").unwrap();
        assert_eq!(unit, FrequencyUnit::GHz);
        assert_eq!(format, ParamFormat::RI);
        assert_eq!(z0, 50.0);

        let (unit, format, z0) = Touchstone::parse_option_line("# MHz S MA R 75").unwrap();
        assert_eq!(unit, FrequencyUnit::MHz);
        assert_eq!(format, ParamFormat::MA);
        assert_eq!(z0, 75.0);

        assert!(Touchstone::parse_option_line("# GHz S XX R 50").is_err());
        assert!(Touchstone::parse_option_line("# GHz S RI R").is_err());
    }

    #[test]
    fn test_param_format_parse() {
        assert_eq!(ParamFormat::parse("RI"), Some(ParamFormat::RI));
        assert_eq!(ParamFormat::parse("ma"), Some(ParamFormat::MA));
        assert_eq!(ParamFormat::parse("DB"), Some(ParamFormat::DB));
        assert_eq!(ParamFormat::parse("invalid"), None);
    }

    #[test]
    fn test_two_port_column_order() {
        // x S11 S21 S12 S22
        let content = "# Hz S RI R 50\n\
                       1e9 0.1 0.0 0.9 0.0 0.8 0.0 0.2 0.0\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();

        assert_eq!(ts.nfreq(), 1);
        assert_relative_eq!(ts.s[0][0][0].re, 0.1); // S11
        assert_relative_eq!(ts.s[0][1][0].re, 0.9); // S21
        assert_relative_eq!(ts.s[0][0][1].re, 0.8); // S12
        assert_relative_eq!(ts.s[0][1][1].re, 0.2); // S22
    }

    #[test]
    fn test_missing_option_line_defaults() {
        let content = "1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();

        assert_eq!(ts.format, ParamFormat::DB);
        assert_eq!(ts.z0, vec![50.0, 50.0]);
        // Default unit is Hz
        assert_relative_eq!(ts.frequency.f()[0], 1e9);
    }

    #[test]
    fn test_db_format_conversion() {
        let content = "# GHz S DB R 50\n1.0 0.0 0.0 -6.0205999 90.0 -6.0205999 90.0 0.0 0.0\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();

        // 0 dB -> magnitude 1.0
        assert_relative_eq!(ts.s[0][0][0].re, 1.0, epsilon = 1e-9);
        // -6.02 dB at 90 degrees -> 0.5i
        assert_relative_eq!(ts.s[0][1][0].re, 0.0, epsilon = 1e-7);
        assert_relative_eq!(ts.s[0][1][0].im, 0.5, epsilon = 1e-7);
    }

    #[test]
    fn test_non_increasing_frequency_is_error() {
        let content = "# Hz S RI R 50\n\
                       2e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n\
                       1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let err = Touchstone::from_str_content(content, 2).unwrap_err();
        assert!(matches!(err, DecodeError::NonIncreasingFrequency { .. }));

        let dup = "# Hz S RI R 50\n\
                   1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n\
                   1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let err = Touchstone::from_str_content(dup, 2).unwrap_err();
        assert!(matches!(err, DecodeError::NonIncreasingFrequency { .. }));
    }

    #[test]
    fn test_wrong_token_count_is_error() {
        // 2-port needs 9 values per point; 7 given in total
        let content = "# Hz S RI R 50\n1e9 0.1 0.0 0.9 0.0 0.9 0.0\n";
        let err = Touchstone::from_str_content(content, 2).unwrap_err();
        assert!(matches!(err, DecodeError::Parse { .. }));
    }

    #[test]
    fn test_non_numeric_token_is_error() {
        let content = "# Hz S RI R 50\n1e9 0.1 abc 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let err = Touchstone::from_str_content(content, 2).unwrap_err();
        assert!(matches!(err, DecodeError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_comments_not_misparsed() {
        let content = "! fixture sweep\n\
                       # Hz S RI R 50\n\
                       1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0 ! trailing note\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();
        assert_eq!(ts.comments, vec!["fixture sweep".to_string()]);
        assert_eq!(ts.nfreq(), 1);
    }

    #[test]
    fn test_thz_option_line() {
        let content = "# THz S RI R 50\n0.3 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();
        assert_relative_eq!(ts.frequency.f()[0], 0.3e12);
        assert_relative_eq!(ts.frequency.f_scaled()[0], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_option_line_after_data_is_error() {
        let content = "1e9 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n\
                       # GHz S RI R 50\n\
                       2.0 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0\n";
        let err = Touchstone::from_str_content(content, 2).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidOption(_)));
    }

    #[test]
    fn test_empty_file_is_error() {
        let err = Touchstone::from_str_content("# Hz S RI R 50\n", 2).unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[test]
    fn test_wrapped_data_lines() {
        // v1 wraps wide rows; a point may span physical lines
        let content = "# Hz S RI R 50\n\
                       1e9 0.1 0.0 0.9 0.0\n\
                       0.9 0.0 0.1 0.0\n";
        let ts = Touchstone::from_str_content(content, 2).unwrap();
        assert_eq!(ts.nfreq(), 1);
        assert_relative_eq!(ts.s[0][1][1].re, 0.1);
    }
}
