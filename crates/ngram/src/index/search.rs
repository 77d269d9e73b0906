//! Similarity search over the gram table

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;
use tracing::trace;

use super::{IndexBuilder, NGramIndex};
use crate::config::IndexConfig;
use crate::error::Result;
use crate::grams::{self, char_len};
use crate::key::KeyFn;
use crate::similarity::ngram_similarity;

/// A member found by a search, with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchMatch<'a, T> {
    pub item: &'a T,
    pub score: f64,
}

impl<T> NGramIndex<T>
where
    T: Eq + Hash + Clone + fmt::Debug + 'static,
{
    /// Members sharing at least one gram with `query`, mapped to the number
    /// of grams shared.
    ///
    /// Shared grams are counted as a multiset intersection: a gram occurring
    /// twice in the query and three times in a member contributes two.
    pub fn shared_gram_counts(&self, query: &str) -> Result<AHashMap<&T, usize>> {
        let padded = self.padded_query(query)?;
        Ok(self.shared_for_padded(&padded))
    }

    /// Alias of [`shared_gram_counts`](Self::shared_gram_counts)
    pub fn items_sharing_ngrams(&self, query: &str) -> Result<AHashMap<&T, usize>> {
        self.shared_gram_counts(query)
    }

    fn shared_for_padded(&self, padded: &str) -> AHashMap<&T, usize> {
        let mut shared: AHashMap<&T, usize> = AHashMap::new();
        // occurrences of (gram, member) still available to match
        let mut remaining: AHashMap<(&str, &T), usize> = AHashMap::new();
        for gram in grams::grams(padded, self.config.n) {
            let Some(postings) = self.grams.get(gram) else {
                continue;
            };
            for (item, &count) in postings {
                let item: &T = item;
                let budget = remaining.entry((gram, item)).or_insert(count);
                if *budget > 0 {
                    *budget -= 1;
                    *shared.entry(item).or_insert(0) += 1;
                }
            }
        }
        shared
    }
}

impl<T> NGramIndex<T>
where
    T: Ord + Hash + Clone + fmt::Debug + 'static,
{
    /// Members whose similarity to `query` is at least `threshold` (the
    /// index default when `None`), best first.
    ///
    /// Equal scores are ordered by the items' natural ordering.
    ///
    /// Only members sharing a gram with the query are candidates. A key whose
    /// padded form is shorter than `n` has no grams, so with a small `pad_len`
    /// such a member is never returned, not even for its own key.
    pub fn search(
        &self,
        query: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<SearchMatch<'_, T>>> {
        let padded = self.padded_query(query)?;
        Ok(self.search_padded(&padded, threshold))
    }

    /// Search using the key of `item` as the query.
    pub fn search_item(
        &self,
        item: &T,
        threshold: Option<f64>,
    ) -> Result<Vec<SearchMatch<'_, T>>> {
        let padded = self.padded_key(item)?;
        Ok(self.search_padded(&padded, threshold))
    }

    /// The best match for `query`, `None` if nothing reaches the threshold.
    pub fn find(&self, query: &str, threshold: Option<f64>) -> Result<Option<&T>> {
        Ok(self.search(query, threshold)?.first().map(|m| m.item))
    }

    /// The best match for the key of `item`.
    pub fn find_item(&self, item: &T, threshold: Option<f64>) -> Result<Option<&T>> {
        Ok(self.search_item(item, threshold)?.first().map(|m| m.item))
    }

    /// The top `count` matches at the default threshold.
    pub fn find_best(&self, query: &str, count: usize) -> Result<Vec<SearchMatch<'_, T>>> {
        let mut matches = self.search(query, None)?;
        matches.truncate(count);
        Ok(matches)
    }

    fn search_padded(&self, padded: &str, threshold: Option<f64>) -> Vec<SearchMatch<'_, T>> {
        let threshold = threshold.unwrap_or(self.config.threshold);
        let n = self.config.n;
        let query_len = char_len(padded);
        let shared = self.shared_for_padded(padded);
        let candidates = shared.len();

        let mut matches: Vec<SearchMatch<'_, T>> = shared
            .into_iter()
            .filter_map(|(item, samegrams)| {
                let item_len = self.members.get(item).copied()?;
                // gram occurrences of both strings, minus those in common
                let allgrams = (query_len + item_len + 2).saturating_sub(2 * n + samegrams);
                let score = ngram_similarity(samegrams, allgrams, self.config.warp);
                (score >= threshold).then_some(SearchMatch { item, score })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.cmp(b.item))
        });

        trace!(
            query_len,
            candidates,
            matches = matches.len(),
            threshold,
            "n-gram search"
        );
        matches
    }
}

impl NGramIndex<String> {
    /// Similarity of two strings under `config`.
    ///
    /// `None` stands for a missing value: two missing values compare 1.0, a
    /// missing and a present value 0.0.
    pub fn compare(s1: Option<&str>, s2: Option<&str>, config: &IndexConfig) -> Result<f64> {
        let (s1, s2) = match (s1, s2) {
            (Some(s1), Some(s2)) => (s1, s2),
            (s1, s2) => return Ok(if s1 == s2 { 1.0 } else { 0.0 }),
        };
        let index = IndexBuilder::new(KeyFn::<String>::identity())
            .config(config.clone())
            .build_with([s1.to_owned()])?;
        let score = index.search(s2, None)?.first().map_or(0.0, |m| m.score);
        Ok(score)
    }
}
