//! Index configuration

use serde::{Deserialize, Serialize};

use crate::error::{NGramError, Result};

/// Tuning parameters of an [`NGramIndex`](crate::NGramIndex).
///
/// Immutable once an index is built. `pad_len` of `None` resolves to `n - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Minimum similarity for a member to be reported by `search` (0.0-1.0)
    pub threshold: f64,
    /// Exponent that raises the similarity of short string pairs (1.0-3.0)
    pub warp: f64,
    /// Characters per gram
    pub n: usize,
    /// Padding characters on each side of a key (0..n)
    pub pad_len: Option<usize>,
    /// Character the padding is made of
    pub pad_char: char,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            warp: 1.0,
            n: 3,
            pad_len: None,
            pad_char: '$',
        }
    }
}

impl IndexConfig {
    /// Check every parameter, reporting the first one out of range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(NGramError::config(
                "threshold",
                self.threshold,
                "must be within 0.0 to 1.0",
            ));
        }
        if !(1.0..=3.0).contains(&self.warp) {
            return Err(NGramError::config(
                "warp",
                self.warp,
                "must be within 1.0 to 3.0",
            ));
        }
        if self.n < 1 {
            return Err(NGramError::config("N", self.n, "must be at least 1"));
        }
        if let Some(pad_len) = self.pad_len {
            if pad_len >= self.n {
                return Err(NGramError::config(
                    "pad_len",
                    pad_len,
                    "must be less than N",
                ));
            }
        }
        Ok(())
    }

    /// Padding length after applying the `n - 1` default
    pub fn resolved_pad_len(&self) -> usize {
        self.pad_len.unwrap_or(self.n.saturating_sub(1))
    }

    /// The padding string placed on both sides of every key
    pub fn padding(&self) -> String {
        std::iter::repeat(self.pad_char)
            .take(self.resolved_pad_len())
            .collect()
    }
}

/// Parse a padding character given as text, which must be exactly one character.
pub fn parse_pad_char(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(NGramError::config(
            "pad_char",
            format!("{:?}", value),
            "must be a single character",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = IndexConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_pad_len(), 2);
        assert_eq!(config.padding(), "$$");
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = IndexConfig {
            threshold: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = IndexConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warp_bounds() {
        for warp in [0.5, 3.01] {
            let config = IndexConfig {
                warp,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("warp"), "{}", err);
        }
        for warp in [1.0, 2.0, 3.0] {
            let config = IndexConfig {
                warp,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_n_zero_rejected() {
        let config = IndexConfig {
            n: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("N"));
    }

    #[test]
    fn test_pad_len_must_be_below_n() {
        let config = IndexConfig {
            n: 2,
            pad_len: Some(2),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IndexConfig {
            n: 2,
            pad_len: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.padding(), "");
    }

    #[test]
    fn test_parse_pad_char() {
        assert_eq!(parse_pad_char("#").unwrap(), '#');
        assert_eq!(parse_pad_char("\u{a0}").unwrap(), '\u{a0}');
        assert!(parse_pad_char("").is_err());
        assert!(parse_pad_char("ab").is_err());
    }
}
