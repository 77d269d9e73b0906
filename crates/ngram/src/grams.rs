//! Padding and splitting of strings into character N-grams
//!
//! Grams are measured in `char`s, so multi-byte characters are never split.

use ahash::AHashMap;

/// Surround `text` with `padding` on both sides.
pub fn pad(padding: &str, text: &str) -> String {
    let mut padded = String::with_capacity(padding.len() * 2 + text.len());
    padded.push_str(padding);
    padded.push_str(text);
    padded.push_str(padding);
    padded
}

/// Sliding window of `n` characters over `text`, stride one.
///
/// A string of `L` characters yields `L - n + 1` grams (none when `L < n`),
/// repeats included.
pub fn grams(text: &str, n: usize) -> Grams<'_> {
    let bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    Grams {
        text,
        bounds,
        n: n.max(1),
        pos: 0,
    }
}

/// Iterator returned by [`grams`], borrowing slices of the input.
#[derive(Debug, Clone)]
pub struct Grams<'a> {
    text: &'a str,
    // byte offset of every char start, plus the end of the string
    bounds: Vec<usize>,
    n: usize,
    pos: usize,
}

impl<'a> Iterator for Grams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let end = self.pos + self.n;
        if end >= self.bounds.len() {
            return None;
        }
        let gram = &self.text[self.bounds[self.pos]..self.bounds[end]];
        self.pos += 1;
        Some(gram)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bounds.len().saturating_sub(self.pos + self.n);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Grams<'_> {}

/// Occurrence count of every gram in `text`.
pub(crate) fn gram_counts(text: &str, n: usize) -> AHashMap<&str, usize> {
    let mut counts = AHashMap::new();
    for gram in grams(text, n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Length in characters
#[inline]
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
