//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::error::{JoinError, Result};
use crate::join::{JoinKind, JoinOptions};

/// Join two CSV files on the N-gram similarity of one column from each
#[derive(Parser, Debug)]
#[command(name = "ngram-join", version, about)]
pub struct Args {
    /// Left-hand CSV file
    pub left_file: PathBuf,

    /// Join column of the left file (0-based)
    pub left_column: usize,

    /// Right-hand CSV file
    pub right_file: PathBuf,

    /// Join column of the right file (0-based)
    pub right_column: usize,

    /// Output CSV file
    pub output: PathBuf,

    /// First line of each input holds column titles
    #[arg(short, long)]
    pub titles: bool,

    /// Join type: outer keeps unmatched left rows, inner drops them
    #[arg(short, long, value_enum, default_value_t = JoinKind::Outer)]
    pub join: JoinKind,

    /// Minimum similarity score for a match
    #[arg(short, long, default_value_t = 0.24)]
    pub minscore: f64,

    /// Maximum matches per left row (0 for all)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub count: i64,

    /// N-gram warp; values above 1 favour short strings
    #[arg(short, long, default_value_t = 1.0)]
    pub warp: f64,

    /// Log level filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Validate the numeric flags and build join options
    pub fn options(&self) -> Result<JoinOptions> {
        let count = usize::try_from(self.count).map_err(|_| JoinError::Count(self.count))?;
        let options = JoinOptions {
            left_column: self.left_column,
            right_column: self.right_column,
            titles: self.titles,
            join: self.join,
            min_score: self.minscore,
            count,
            warp: self.warp,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["ngram-join", "left.csv", "1", "right.csv", "0", "out.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.left_column, 1);
        assert_eq!(args.right_column, 0);
        assert!(!args.titles);

        let options = args.options().unwrap();
        assert_eq!(options.join, JoinKind::Outer);
        assert_eq!(options.min_score, 0.24);
        assert_eq!(options.count, 0);
        assert_eq!(options.warp, 1.0);
    }

    #[test]
    fn test_flags() {
        let args = parse(&["-t", "-j", "inner", "-m", "0.5", "-c", "3", "-w", "2"]);
        let options = args.options().unwrap();
        assert!(options.titles);
        assert_eq!(options.join, JoinKind::Inner);
        assert_eq!(options.min_score, 0.5);
        assert_eq!(options.count, 3);
        assert_eq!(options.warp, 2.0);
    }

    #[test]
    fn test_negative_count() {
        let err = parse(&["--count", "-1"]).options().unwrap_err();
        assert!(matches!(err, JoinError::Count(-1)));
    }

    #[test]
    fn test_minscore_out_of_range() {
        let err = parse(&["--minscore", "1.5"]).options().unwrap_err();
        assert!(matches!(err, JoinError::MinScore(_)));
    }

    #[test]
    fn test_missing_positional() {
        assert!(Args::try_parse_from(["ngram-join", "left.csv", "1"]).is_err());
    }
}
