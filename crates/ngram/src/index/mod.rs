//! NGramIndex - set of items searchable by N-gram similarity
//!
//! The index owns three pieces of state that always change together:
//!
//! - `members`: every indexed item, mapped to the length (in chars) of its
//!   padded key
//! - `grams`: for each gram, the members containing it and how many times
//! - the configuration and key functions, fixed at construction
//!
//! Each member is allocated once behind an `Arc`; posting lists hold
//! pointers to it, not copies.
//!
//! All mutation goes through [`NGramIndex::add`] and [`NGramIndex::remove`],
//! including the set-algebra methods.

mod search;
mod set_ops;

pub use search::SearchMatch;

use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::config::{parse_pad_char, IndexConfig};
use crate::error::{NGramError, Result};
use crate::grams::{self, char_len};
use crate::key::KeyFn;

/// A set of items that supports lookup by N-gram string similarity.
pub struct NGramIndex<T> {
    config: IndexConfig,
    padding: String,
    item_key: KeyFn<T>,
    query_key: Option<KeyFn<str>>,
    members: AHashMap<Arc<T>, usize>,
    grams: AHashMap<String, AHashMap<Arc<T>, usize>>,
}

/// Iterator over the members of an [`NGramIndex`], in arbitrary order
#[derive(Clone)]
pub struct Iter<'a, T> {
    inner: hash_map::Keys<'a, Arc<T>, usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|item| &**item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Fluent construction of an [`NGramIndex`]. Validation happens in `build`.
pub struct IndexBuilder<T> {
    config: IndexConfig,
    item_key: KeyFn<T>,
    query_key: Option<KeyFn<str>>,
    error: Option<NGramError>,
}

impl<T: 'static> IndexBuilder<T> {
    /// Start a builder whose items are converted to strings by `item_key`.
    pub fn new(item_key: KeyFn<T>) -> Self {
        Self {
            config: IndexConfig::default(),
            item_key,
            query_key: None,
            error: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn warp(mut self, warp: f64) -> Self {
        self.config.warp = warp;
        self
    }

    pub fn n(mut self, n: usize) -> Self {
        self.config.n = n;
        self
    }

    pub fn pad_len(mut self, pad_len: usize) -> Self {
        self.config.pad_len = Some(pad_len);
        self
    }

    pub fn pad_char(mut self, pad_char: char) -> Self {
        self.config.pad_char = pad_char;
        self
    }

    /// Padding character given as text; anything but one character fails `build`.
    pub fn pad_str(mut self, pad_char: &str) -> Self {
        match parse_pad_char(pad_char) {
            Ok(c) => self.config.pad_char = c,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Transform applied to query strings before splitting
    pub fn query_key(mut self, query_key: KeyFn<str>) -> Self {
        self.query_key = Some(query_key);
        self
    }
}

impl<T> IndexBuilder<T>
where
    T: Eq + Hash + Clone + fmt::Debug + 'static,
{
    /// Build an empty index
    pub fn build(self) -> Result<NGramIndex<T>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        NGramIndex::from_parts(self.config, self.item_key, self.query_key)
    }

    /// Build an index seeded with `items`, indexed exactly as repeated `add` calls.
    pub fn build_with<I>(self, items: I) -> Result<NGramIndex<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut index = self.build()?;
        index.update(items)?;
        debug!(
            members = index.len(),
            grams = index.grams.len(),
            n = index.config.n,
            "built n-gram index"
        );
        Ok(index)
    }
}

impl<T> NGramIndex<T>
where
    T: AsRef<str> + Eq + Hash + Clone + fmt::Debug + 'static,
{
    /// Empty index over string-like items with the default configuration
    pub fn new() -> Self {
        let config = IndexConfig::default();
        Self {
            padding: config.padding(),
            config,
            item_key: KeyFn::identity(),
            query_key: None,
            members: AHashMap::new(),
            grams: AHashMap::new(),
        }
    }

    /// Builder over string-like items, keyed by identity
    pub fn builder() -> IndexBuilder<T> {
        IndexBuilder::new(KeyFn::identity())
    }
}

impl<T> Default for NGramIndex<T>
where
    T: AsRef<str> + Eq + Hash + Clone + fmt::Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NGramIndex<T>
where
    T: Eq + Hash + Clone + fmt::Debug + 'static,
{
    pub(crate) fn from_parts(
        config: IndexConfig,
        item_key: KeyFn<T>,
        query_key: Option<KeyFn<str>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            padding: config.padding(),
            config,
            item_key,
            query_key,
            members: AHashMap::new(),
            grams: AHashMap::new(),
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn warp(&self) -> f64 {
        self.config.warp
    }

    pub fn n(&self) -> usize {
        self.config.n
    }

    pub fn pad_len(&self) -> usize {
        self.config.resolved_pad_len()
    }

    pub fn pad_char(&self) -> char {
        self.config.pad_char
    }

    /// Padding placed on both sides of every key
    pub fn padding(&self) -> &str {
        &self.padding
    }

    pub fn item_key(&self) -> &KeyFn<T> {
        &self.item_key
    }

    pub fn query_key(&self) -> Option<&KeyFn<str>> {
        self.query_key.as_ref()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.members.contains_key(item)
    }

    /// Members in arbitrary order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.members.keys(),
        }
    }

    /// Length of the member's padded key, `None` for non-members
    pub fn padded_len(&self, item: &T) -> Option<usize> {
        self.members.get(item).copied()
    }

    /// Number of distinct grams currently indexed
    pub fn gram_count(&self) -> usize {
        self.grams.len()
    }

    /// Occurrences of `gram` in the padded key of `item`, 0 if absent
    pub fn gram_occurrences(&self, gram: &str, item: &T) -> usize {
        self.grams
            .get(gram)
            .and_then(|postings| postings.get(item))
            .copied()
            .unwrap_or(0)
    }

    /// The string form of an item
    pub fn key(&self, item: &T) -> Result<String> {
        self.item_key
            .apply(item)
            .map_err(|source| NGramError::KeyFunction {
                input: format!("{:?}", item),
                source,
            })
    }

    /// Surround a string with this index's padding
    pub fn pad(&self, text: &str) -> String {
        grams::pad(&self.padding, text)
    }

    /// Pad a string and split it into grams
    pub fn split(&self, text: &str) -> Vec<String> {
        let padded = self.pad(text);
        grams::grams(&padded, self.config.n)
            .map(str::to_owned)
            .collect()
    }

    /// Pad the key of an item and split it into grams
    pub fn split_item(&self, item: &T) -> Result<Vec<String>> {
        Ok(self.split(&self.key(item)?))
    }

    fn padded_key(&self, item: &T) -> Result<String> {
        Ok(self.pad(&self.key(item)?))
    }

    fn padded_query(&self, query: &str) -> Result<String> {
        match &self.query_key {
            Some(query_key) => {
                let key = query_key
                    .apply(query)
                    .map_err(|source| NGramError::KeyFunction {
                        input: format!("{:?}", query),
                        source,
                    })?;
                Ok(self.pad(&key))
            }
            None => Ok(self.pad(query)),
        }
    }

    /// Add an item. Returns `false` if it was already a member.
    ///
    /// The key is computed before anything is touched, so a failing key
    /// function leaves the index unchanged.
    pub fn add(&mut self, item: T) -> Result<bool> {
        if self.members.contains_key(&item) {
            return Ok(false);
        }
        let padded = self.padded_key(&item)?;
        let item = Arc::new(item);
        for (gram, count) in grams::gram_counts(&padded, self.config.n) {
            if let Some(postings) = self.grams.get_mut(gram) {
                postings.insert(Arc::clone(&item), count);
            } else {
                let mut postings = AHashMap::new();
                postings.insert(Arc::clone(&item), count);
                self.grams.insert(gram.to_owned(), postings);
            }
        }
        self.members.insert(item, char_len(&padded));
        Ok(true)
    }

    /// Add every item, stopping at the first key function failure.
    pub fn update<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Remove a member, undoing exactly what `add` recorded.
    pub fn remove(&mut self, item: &T) -> Result<()> {
        if !self.members.contains_key(item) {
            return Err(NGramError::NotFound(format!("{:?}", item)));
        }
        let padded = self.padded_key(item)?;
        let distinct: AHashSet<&str> = grams::grams(&padded, self.config.n).collect();
        for gram in distinct {
            if let Some(postings) = self.grams.get_mut(gram) {
                postings.remove(item);
                if postings.is_empty() {
                    self.grams.remove(gram);
                }
            }
        }
        self.members.remove(item);
        Ok(())
    }

    /// Remove a member if present. Returns whether anything was removed.
    pub fn discard(&mut self, item: &T) -> Result<bool> {
        if !self.contains(item) {
            return Ok(false);
        }
        self.remove(item)?;
        Ok(true)
    }

    /// Remove and return an arbitrary member, `None` when empty.
    pub fn pop(&mut self) -> Result<Option<T>> {
        let Some(item) = self.iter().next().cloned() else {
            return Ok(None);
        };
        self.remove(&item)?;
        Ok(Some(item))
    }

    /// Remove all members
    pub fn clear(&mut self) {
        self.members.clear();
        self.grams.clear();
    }

    /// New index with the same configuration over the current members.
    ///
    /// The gram table is rebuilt, not shared; items themselves are cloned.
    pub fn copy(&self) -> Result<Self> {
        self.copy_with(self.iter().cloned())
    }

    /// New index with the same configuration over `items`.
    pub fn copy_with<I>(&self, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut index = Self::from_parts(
            self.config.clone(),
            self.item_key.clone(),
            self.query_key.clone(),
        )?;
        index.update(items)?;
        debug!(members = index.len(), "copied n-gram index");
        Ok(index)
    }
}

impl<T> fmt::Debug for NGramIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NGramIndex")
            .field("config", &self.config)
            .field("item_key", &self.item_key)
            .field("query_key", &self.query_key)
            .field("members", &self.members.len())
            .field("grams", &self.grams.len())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a NGramIndex<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.members.keys(),
        }
    }
}
