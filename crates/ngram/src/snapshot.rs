//! Serializable form of an index
//!
//! A snapshot holds only what is needed to rebuild the index: the members,
//! the configuration and the names of the key functions. The gram table is
//! derived state and is recomputed on restore.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndexConfig;
use crate::error::{NGramError, Result};
use crate::index::NGramIndex;
use crate::key::KeyRegistry;

/// Reconstructible state of an [`NGramIndex`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot<T> {
    /// Members, sorted
    pub items: Vec<T>,
    pub config: IndexConfig,
    /// Registered name of the item key function
    pub item_key: String,
    /// Registered name of the query key function, if any
    pub query_key: Option<String>,
}

impl<T> NGramIndex<T>
where
    T: Ord + Hash + Clone + fmt::Debug + 'static,
{
    /// Capture the index as a snapshot.
    ///
    /// Fails with [`NGramError::NotSerializable`] if either key function is
    /// an unnamed closure.
    pub fn to_snapshot(&self) -> Result<IndexSnapshot<T>> {
        let item_key = self
            .item_key()
            .name()
            .ok_or(NGramError::NotSerializable("item key"))?
            .to_owned();
        let query_key = match self.query_key() {
            Some(key) => Some(
                key.name()
                    .ok_or(NGramError::NotSerializable("query key"))?
                    .to_owned(),
            ),
            None => None,
        };
        let mut items: Vec<T> = self.iter().cloned().collect();
        items.sort();
        Ok(IndexSnapshot {
            items,
            config: self.config().clone(),
            item_key,
            query_key,
        })
    }

    /// Rebuild an index from a snapshot, resolving key function names
    /// through the registries.
    pub fn from_snapshot(
        snapshot: IndexSnapshot<T>,
        item_keys: &KeyRegistry<T>,
        query_keys: &KeyRegistry<str>,
    ) -> Result<Self> {
        let item_key = item_keys
            .get(&snapshot.item_key)
            .cloned()
            .ok_or_else(|| NGramError::UnknownKeyFunction(snapshot.item_key.clone()))?;
        let query_key = match &snapshot.query_key {
            Some(name) => Some(
                query_keys
                    .get(name)
                    .cloned()
                    .ok_or_else(|| NGramError::UnknownKeyFunction(name.clone()))?,
            ),
            None => None,
        };
        let mut index = Self::from_parts(snapshot.config, item_key, query_key)?;
        index.update(snapshot.items)?;
        debug!(
            members = index.len(),
            grams = index.gram_count(),
            "restored n-gram index from snapshot"
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use crate::key::{KeyError, KeyFn};
    use pretty_assertions::assert_eq;

    fn hex_key(item: &u32) -> std::result::Result<String, KeyError> {
        Ok(format!("{:#x}", item))
    }

    fn lowercase(query: &str) -> std::result::Result<String, KeyError> {
        Ok(query.to_lowercase())
    }

    #[test]
    fn test_snapshot_roundtrip_through_json() {
        let index = IndexBuilder::new(KeyFn::<u32>::named("hex", hex_key))
            .threshold(0.1)
            .warp(2.0)
            .query_key(KeyFn::<str>::named("lowercase", lowercase))
            .build_with([0xDEAD, 0xBEEF])
            .unwrap();

        let snapshot = index.to_snapshot().unwrap();
        assert_eq!(snapshot.items, vec![0xBEEF, 0xDEAD]);
        assert_eq!(snapshot.item_key, "hex");
        assert_eq!(snapshot.query_key.as_deref(), Some("lowercase"));

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: IndexSnapshot<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);

        let item_keys = KeyRegistry::<u32>::new().with(KeyFn::named("hex", hex_key));
        let query_keys = KeyRegistry::<str>::new().with(KeyFn::named("lowercase", lowercase));
        let restored = NGramIndex::from_snapshot(decoded, &item_keys, &query_keys).unwrap();

        assert_eq!(restored.config(), index.config());
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.gram_count(), index.gram_count());
        assert_eq!(
            restored.search("0XDEAD", None).unwrap(),
            index.search("0XDEAD", None).unwrap()
        );
    }

    #[test]
    fn test_identity_snapshot() {
        let index = NGramIndex::<String>::builder()
            .build_with(["spam".to_string(), "eggs".to_string()])
            .unwrap();
        let snapshot = index.to_snapshot().unwrap();
        assert_eq!(snapshot.item_key, crate::key::IDENTITY);
        assert_eq!(snapshot.query_key, None);

        let item_keys = KeyRegistry::<String>::with_identity();
        let restored =
            NGramIndex::from_snapshot(snapshot, &item_keys, &KeyRegistry::new()).unwrap();
        assert_eq!(restored.find("spom", None).unwrap().map(String::as_str), Some("spam"));
    }

    #[test]
    fn test_closure_key_is_not_serializable() {
        let index = IndexBuilder::new(KeyFn::<String>::closure(|s| Ok(s.to_uppercase())))
            .build_with(["spam".to_string()])
            .unwrap();
        let err = index.to_snapshot().unwrap_err();
        assert!(matches!(err, NGramError::NotSerializable("item key")));

        let index = NGramIndex::<String>::builder()
            .query_key(KeyFn::<str>::closure(|s| Ok(s.trim().to_owned())))
            .build()
            .unwrap();
        let err = index.to_snapshot().unwrap_err();
        assert!(matches!(err, NGramError::NotSerializable("query key")));
    }

    #[test]
    fn test_unknown_key_name() {
        let snapshot = IndexSnapshot {
            items: vec!["spam".to_string()],
            config: IndexConfig::default(),
            item_key: "missing".to_string(),
            query_key: None,
        };
        let item_keys = KeyRegistry::<String>::with_identity();
        let err = NGramIndex::from_snapshot(snapshot, &item_keys, &KeyRegistry::new()).unwrap_err();
        assert!(matches!(err, NGramError::UnknownKeyFunction(name) if name == "missing"));
    }

    #[test]
    fn test_invalid_config_in_snapshot() {
        let snapshot = IndexSnapshot {
            items: vec!["spam".to_string()],
            config: IndexConfig {
                warp: 4.0,
                ..Default::default()
            },
            item_key: crate::key::IDENTITY.to_string(),
            query_key: None,
        };
        let item_keys = KeyRegistry::<String>::with_identity();
        let err = NGramIndex::from_snapshot(snapshot, &item_keys, &KeyRegistry::new()).unwrap_err();
        assert!(matches!(err, NGramError::Configuration { param: "warp", .. }));
    }
}
