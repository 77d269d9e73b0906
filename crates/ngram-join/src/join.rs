//! CSV similarity join
//!
//! Every row of the right-hand file goes into an [`NGramIndex`] keyed on its
//! join column. Each left-hand row is then searched against it and written
//! once per match as `left fields, rank, similarity, right fields`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ngram::{IndexBuilder, KeyFn, NGramIndex};
use tracing::{debug, info};

use crate::error::{JoinError, Result};

/// Which left-hand rows appear in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum JoinKind {
    /// Only rows with at least one match
    Inner,
    /// Every row; unmatched rows are written on their own
    Outer,
}

/// Settings for one join run
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOptions {
    pub left_column: usize,
    pub right_column: usize,
    /// First record of each input is a title row
    pub titles: bool,
    pub join: JoinKind,
    pub min_score: f64,
    /// Matches kept per left row, 0 for all
    pub count: usize,
    pub warp: f64,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            left_column: 0,
            right_column: 0,
            titles: false,
            join: JoinKind::Outer,
            min_score: 0.24,
            count: 0,
            warp: 1.0,
        }
    }
}

impl JoinOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(JoinError::MinScore(self.min_score));
        }
        Ok(())
    }
}

/// Row counts of a finished join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub left_rows: usize,
    pub right_rows: usize,
    /// Left rows with at least one match
    pub matched_rows: usize,
    /// Records written, title row excluded
    pub written_rows: usize,
}

/// Normalize a join field: runs of whitespace become one space, then
/// the result is lowercased.
pub fn normalize(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut in_space = false;
    for c in field.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.to_lowercase()
}

/// Join two CSV files into `output`.
pub fn join_files(
    left: &Path,
    right: &Path,
    output: &Path,
    options: &JoinOptions,
) -> Result<JoinStats> {
    for path in [left, right] {
        if !path.exists() {
            return Err(JoinError::MissingFile(path.to_path_buf()));
        }
    }
    // inputs are fully read and checked before the output is truncated
    let prepared = PreparedJoin::read(File::open(left)?, File::open(right)?, options)?;
    let stats = prepared.write(File::create(output)?, options)?;
    info!(
        left = stats.left_rows,
        right = stats.right_rows,
        matched = stats.matched_rows,
        written = stats.written_rows,
        output = %output.display(),
        "join complete"
    );
    Ok(stats)
}

/// Join CSV data from two readers, writing CSV to `output`.
pub fn join_readers<L, R, W>(
    left: L,
    right: R,
    output: W,
    options: &JoinOptions,
) -> Result<JoinStats>
where
    L: Read,
    R: Read,
    W: Write,
{
    PreparedJoin::read(left, right, options)?.write(output, options)
}

/// Both inputs parsed, the right side indexed and every left key extracted.
struct PreparedJoin {
    left_titles: Option<Vec<String>>,
    right_titles: Option<Vec<String>>,
    /// Left rows with their normalized join field
    left_rows: Vec<(Vec<String>, String)>,
    right_rows: usize,
    index: NGramIndex<Vec<String>>,
}

impl PreparedJoin {
    fn read<L: Read, R: Read>(left: L, right: R, options: &JoinOptions) -> Result<Self> {
        options.validate()?;

        let mut right_reader = csv_reader(right, options.titles);
        let right_titles = read_titles(&mut right_reader, options.titles)?;
        let rows = read_rows(&mut right_reader)?;
        let right_rows = rows.len();

        let index = build_index(rows, options)?;
        debug!(
            rows = right_rows,
            distinct = index.len(),
            grams = index.gram_count(),
            "indexed right-hand file"
        );

        let mut left_reader = csv_reader(left, options.titles);
        let left_titles = read_titles(&mut left_reader, options.titles)?;
        let left_rows = read_rows(&mut left_reader)?
            .into_iter()
            .enumerate()
            .map(|(row_number, row)| {
                let query = row.get(options.left_column).map(|field| normalize(field));
                match query {
                    Some(query) => Ok((row, query)),
                    None => Err(JoinError::MissingColumn {
                        file: "left",
                        row: row_number + 1,
                        column: options.left_column,
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            left_titles,
            right_titles,
            left_rows,
            right_rows,
            index,
        })
    }

    fn write<W: Write>(&self, output: W, options: &JoinOptions) -> Result<JoinStats> {
        let mut stats = JoinStats {
            right_rows: self.right_rows,
            ..Default::default()
        };
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(output);

        if let (Some(left_titles), Some(right_titles)) = (&self.left_titles, &self.right_titles) {
            let mut header = left_titles.clone();
            header.push("Rank".to_string());
            header.push("Similarity".to_string());
            header.extend(right_titles.iter().cloned());
            writer.write_record(&header)?;
        }

        for (row, query) in &self.left_rows {
            stats.left_rows += 1;
            let mut matches = self.index.search(query, Some(options.min_score))?;
            if options.count > 0 {
                matches.truncate(options.count);
            }

            if matches.is_empty() {
                if options.join == JoinKind::Outer {
                    writer.write_record(row)?;
                    stats.written_rows += 1;
                }
                continue;
            }

            stats.matched_rows += 1;
            for (rank, m) in matches.iter().enumerate() {
                let mut record = row.clone();
                record.push((rank + 1).to_string());
                record.push(format_score(m.score));
                record.extend(m.item.iter().cloned());
                writer.write_record(&record)?;
                stats.written_rows += 1;
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}

fn csv_reader<R: Read>(input: R, titles: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(titles)
        .flexible(true)
        .from_reader(input)
}

fn read_titles<R: Read>(
    reader: &mut csv::Reader<R>,
    titles: bool,
) -> Result<Option<Vec<String>>> {
    if !titles {
        return Ok(None);
    }
    let headers = reader.headers()?;
    Ok(Some(headers.iter().map(str::to_owned).collect()))
}

/// Data records, skipping blank lines
fn read_rows<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

fn build_index(
    rows: Vec<Vec<String>>,
    options: &JoinOptions,
) -> Result<NGramIndex<Vec<String>>> {
    let column = options.right_column;
    let key = KeyFn::<Vec<String>>::closure(move |row| {
        row.get(column)
            .map(|field| normalize(field))
            .ok_or_else(|| format!("right-hand row has no column {}", column).into())
    });
    let index = IndexBuilder::new(key)
        .threshold(options.min_score)
        .warp(options.warp)
        .build_with(rows)?;
    Ok(index)
}

/// Shortest form that reads back to the same value, always with a
/// fractional part ("1.0", "0.25").
fn format_score(score: f64) -> String {
    format!("{:?}", score)
}
