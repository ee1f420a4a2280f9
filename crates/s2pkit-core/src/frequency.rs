//! Frequency module - a frequency vector with a display unit
//!
//! Frequencies are stored in Hz internally; the unit only controls how the
//! values are scaled when written back to a Touchstone file.

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            "mhz" => Some(FrequencyUnit::MHz),
            "ghz" => Some(FrequencyUnit::GHz),
            "thz" => Some(FrequencyUnit::THz),
            _ => None,
        }
    }

    /// Option-line token for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
            FrequencyUnit::THz => "THz",
        }
    }
}

/// A frequency vector representation
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Display unit
    unit: FrequencyUnit,
}

impl Frequency {
    /// Create from a frequency vector in the given unit
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit) -> Self {
        let mult = unit.multiplier();
        let f_hz: Vec<f64> = f.iter().map(|&x| x * mult).collect();
        Self { f: f_hz, unit }
    }

    /// Create from a frequency vector already in Hz
    pub fn from_hz(f: Vec<f64>, unit: FrequencyUnit) -> Self {
        Self { f, unit }
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Get frequency vector in the display unit
    pub fn f_scaled(&self) -> Vec<f64> {
        let mult = self.unit.multiplier();
        self.f.iter().map(|&x| x / mult).collect()
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Get the display unit
    #[inline]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_f() {
        let freq = Frequency::from_f(vec![1.0, 5.0, 200.0], FrequencyUnit::KHz);

        assert_eq!(freq.npoints(), 3);
        assert_relative_eq!(freq.f()[0], 1e3, epsilon = 1e-10);
        assert_relative_eq!(freq.f()[1], 5e3, epsilon = 1e-10);
        assert_relative_eq!(freq.f()[2], 200e3, epsilon = 1e-10);

        let scaled = freq.f_scaled();
        assert_relative_eq!(scaled[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(scaled[2], 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_multiplier() {
        assert_eq!(FrequencyUnit::Hz.multiplier(), 1.0);
        assert_eq!(FrequencyUnit::KHz.multiplier(), 1e3);
        assert_eq!(FrequencyUnit::MHz.multiplier(), 1e6);
        assert_eq!(FrequencyUnit::GHz.multiplier(), 1e9);
        assert_eq!(FrequencyUnit::THz.multiplier(), 1e12);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!(FrequencyUnit::parse("ghz"), Some(FrequencyUnit::GHz));
        assert_eq!(FrequencyUnit::parse("GHZ"), Some(FrequencyUnit::GHz));
        assert_eq!(FrequencyUnit::parse("MHz"), Some(FrequencyUnit::MHz));
        assert_eq!(FrequencyUnit::parse("thz"), Some(FrequencyUnit::THz));
        assert_eq!(FrequencyUnit::parse("invalid"), None);
    }
}
