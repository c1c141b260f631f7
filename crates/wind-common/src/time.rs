//! Time keys for gridded meteorological observations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from time key construction or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeKeyError {
    #[error("forecast step {0} out of range (must be < 100 hours)")]
    StepOutOfRange(u32),

    #[error("invalid date {0} (expected YYYYMMDD)")]
    InvalidDate(u32),

    #[error("cannot decode stored time value {0}")]
    InvalidEncoded(i64),
}

/// Uniquely identifies one observation instant: a data date plus a
/// forecast step offset in hours.
///
/// Ordering is lexicographic on `(date, step)`, which matches the
/// numeric ordering of the encoded form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeKey {
    /// Integer date, `YYYYMMDD`.
    pub date: u32,
    /// Forecast step offset from the date, in hours.
    pub step: u32,
}

impl TimeKey {
    /// Create a new time key, validating both fields.
    pub fn new(date: u32, step: u32) -> Result<Self, TimeKeyError> {
        if step >= 100 {
            return Err(TimeKeyError::StepOutOfRange(step));
        }
        let month = (date / 100) % 100;
        let day = date % 100;
        if !(19000101..=29991231).contains(&date) || month == 0 || month > 12 || day == 0 || day > 31
        {
            return Err(TimeKeyError::InvalidDate(date));
        }
        Ok(Self { date, step })
    }

    /// Encode as a single `i64` suitable for the persisted `time` axis
    /// (`YYYYMMDDHH`-style: `date * 100 + step`).
    pub fn encode(&self) -> i64 {
        self.date as i64 * 100 + self.step as i64
    }

    /// Decode a persisted `time` value back into a key.
    pub fn decode(encoded: i64) -> Result<Self, TimeKeyError> {
        if encoded <= 0 {
            return Err(TimeKeyError::InvalidEncoded(encoded));
        }
        let date = (encoded / 100) as u32;
        let step = (encoded % 100) as u32;
        Self::new(date, step).map_err(|_| TimeKeyError::InvalidEncoded(encoded))
    }

    /// Calendar year of the data date.
    pub fn year(&self) -> i32 {
        (self.date / 10000) as i32
    }

    /// Calendar month (1-12) of the data date.
    pub fn month(&self) -> u32 {
        (self.date / 100) % 100
    }

    /// The (year, month) bucket this key belongs to.
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year(),
            month: self.month(),
        }
    }
}

impl std::fmt::Display for TimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{:02}h", self.date, self.step)
    }
}

/// Identifies one calendar month of data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// `YYYY-MM` label used in file names and the processed-months ledger.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let key = TimeKey::new(20020615, 12).unwrap();
        assert_eq!(key.encode(), 2002061512);
        assert_eq!(TimeKey::decode(2002061512).unwrap(), key);
    }

    #[test]
    fn test_ordering_matches_encoded_ordering() {
        let a = TimeKey::new(20020615, 23).unwrap();
        let b = TimeKey::new(20020616, 0).unwrap();
        assert!(a < b);
        assert!(a.encode() < b.encode());

        let c = TimeKey::new(20020615, 6).unwrap();
        assert!(c < a);
        assert!(c.encode() < a.encode());
    }

    #[test]
    fn test_step_out_of_range() {
        assert_eq!(
            TimeKey::new(20020615, 100),
            Err(TimeKeyError::StepOutOfRange(100))
        );
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(TimeKey::new(20021301, 0).is_err()); // month 13
        assert!(TimeKey::new(20020600, 0).is_err()); // day 0
        assert!(TimeKey::new(123, 0).is_err());
    }

    #[test]
    fn test_month_key() {
        let key = TimeKey::new(19900131, 18).unwrap();
        assert_eq!(key.month_key(), MonthKey::new(1990, 1));
        assert_eq!(key.month_key().label(), "1990-01");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TimeKey::decode(0).is_err());
        assert!(TimeKey::decode(-42).is_err());
    }
}
