//! File-level tests for the CSV join

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use ngram_join::cli::Args;
use ngram_join::{join_files, JoinError, JoinKind, JoinOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper to write the two input files into a temp dir
fn setup(left: &str, right: &str) -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let left_path = dir.path().join("left.csv");
    let right_path = dir.path().join("right.csv");
    let out_path = dir.path().join("out.csv");
    fs::write(&left_path, left).unwrap();
    fs::write(&right_path, right).unwrap();
    (dir, left_path, right_path, out_path)
}

const LEFT: &str = "ID,NAME\n1,Joe\n2,Kin\n3,ZAS\n";
const RIGHT: &str = "ID,NAME\nA,Joe\nB,Jon\nC,Job\nD,Kim\n";

#[test]
fn test_join_files_with_titles() {
    let (_dir, left, right, out) = setup(LEFT, RIGHT);
    let options = JoinOptions {
        left_column: 1,
        right_column: 1,
        titles: true,
        ..Default::default()
    };

    let stats = join_files(&left, &right, &out, &options).unwrap();
    assert_eq!(stats.written_rows, 5);

    let written = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().map(str::trim).collect();
    assert_eq!(
        lines,
        vec![
            "ID,NAME,Rank,Similarity,ID,NAME",
            "1,Joe,1,1.0,A,Joe",
            "1,Joe,2,0.25,B,Jon",
            "1,Joe,3,0.25,C,Job",
            "2,Kin,1,0.25,D,Kim",
            "3,ZAS",
        ]
    );
}

#[test]
fn test_join_files_from_args() {
    let (_dir, left, right, out) = setup(LEFT, RIGHT);
    let args = Args::try_parse_from([
        "ngram-join",
        left.to_str().unwrap(),
        "1",
        right.to_str().unwrap(),
        "1",
        out.to_str().unwrap(),
        "--titles",
        "--join",
        "inner",
    ])
    .unwrap();
    let options = args.options().unwrap();
    assert_eq!(options.join, JoinKind::Inner);

    join_files(&args.left_file, &args.right_file, &args.output, &options).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    assert!(!written.contains("ZAS"));
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn test_quoted_fields_survive() {
    let (_dir, left, right, out) = setup(
        "1,\"Smith,  John\"\n",
        "\"SMITH, JOHN\",\"has \"\"quotes\"\"\"\n",
    );
    let options = JoinOptions {
        left_column: 1,
        right_column: 0,
        ..Default::default()
    };
    join_files(&left, &right, &out, &options).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "1,\"Smith,  John\",1,1.0,\"SMITH, JOHN\",\"has \"\"quotes\"\"\"\n"
    );
}

#[test]
fn test_missing_input_file() {
    let (dir, left, _right, out) = setup(LEFT, RIGHT);
    let missing = dir.path().join("nothere.csv");

    let err = join_files(&left, &missing, &out, &JoinOptions::default()).unwrap_err();
    assert!(matches!(&err, JoinError::MissingFile(path) if path == &missing));
    assert!(err.to_string().contains("nothere.csv"));
    assert!(!out.exists());
}

#[test]
fn test_invalid_min_score() {
    let (_dir, left, right, out) = setup(LEFT, RIGHT);
    let options = JoinOptions {
        min_score: -0.1,
        ..Default::default()
    };
    let err = join_files(&left, &right, &out, &options).unwrap_err();
    assert!(matches!(err, JoinError::MinScore(_)));
}

/// Helper to run a failing join over an existing output file
fn assert_output_untouched(left: &str, right: &str, options: &JoinOptions) -> JoinError {
    let (_dir, left, right, out) = setup(left, right);
    fs::write(&out, "previous results\n").unwrap();

    let err = join_files(&left, &right, &out, options).unwrap_err();
    assert_eq!(fs::read_to_string(&out).unwrap(), "previous results\n");
    err
}

#[test]
fn test_bad_right_row_keeps_existing_output() {
    let options = JoinOptions {
        left_column: 0,
        right_column: 1,
        ..Default::default()
    };
    let err = assert_output_untouched("joe\n", "A,Joe\nB\n", &options);
    assert!(matches!(err, JoinError::Index(_)));
}

#[test]
fn test_short_left_row_keeps_existing_output() {
    let options = JoinOptions {
        left_column: 1,
        right_column: 1,
        ..Default::default()
    };
    let err = assert_output_untouched("1,Joe\n2\n", "A,Joe\n", &options);
    assert!(matches!(err, JoinError::MissingColumn { row: 2, .. }));
}

#[test]
fn test_invalid_options_keep_existing_output() {
    let options = JoinOptions {
        min_score: 1.5,
        ..Default::default()
    };
    let err = assert_output_untouched(LEFT, RIGHT, &options);
    assert!(matches!(err, JoinError::MinScore(_)));
}
