//! Set algebra built on add/remove so the gram table always stays in step
//!
//! `other` is anything that iterates `&T`: another index, a `Vec`, a `HashSet`.

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;

use super::NGramIndex;
use crate::error::Result;

impl<T> NGramIndex<T>
where
    T: Eq + Hash + Clone + fmt::Debug + 'static,
{
    /// New index holding members of either set
    pub fn union<'a, I>(&self, other: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.copy_with(self.iter().cloned().chain(other.into_iter().cloned()))
    }

    /// New index holding members of both sets
    pub fn intersection<'a, I>(&self, other: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other: AHashSet<&T> = other.into_iter().collect();
        self.copy_with(self.iter().filter(|item| other.contains(item)).cloned())
    }

    /// New index holding members not in `other`
    pub fn difference<'a, I>(&self, other: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other: AHashSet<&T> = other.into_iter().collect();
        self.copy_with(self.iter().filter(|item| !other.contains(item)).cloned())
    }

    /// New index holding members of exactly one of the sets
    pub fn symmetric_difference<'a, I>(&self, other: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other: AHashSet<&T> = other.into_iter().collect();
        let only_self = self.iter().filter(|item| !other.contains(item)).cloned();
        let only_other = other
            .iter()
            .filter(|item| !self.contains(item))
            .map(|item| (*item).clone());
        self.copy_with(only_self.chain(only_other))
    }

    /// Add every member of `other`
    pub fn union_update<'a, I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.update(other.into_iter().cloned())
    }

    /// Keep only members also in `other`
    pub fn intersection_update<'a, I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let keep: AHashSet<&T> = other.into_iter().collect();
        let dropped: Vec<T> = self
            .iter()
            .filter(|item| !keep.contains(item))
            .cloned()
            .collect();
        for item in &dropped {
            self.discard(item)?;
        }
        Ok(())
    }

    /// Remove every member of `other`
    pub fn difference_update<'a, I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for item in other {
            self.discard(item)?;
        }
        Ok(())
    }

    /// Keep members of exactly one of the sets.
    ///
    /// The intersection is taken before anything changes, then all of `other`
    /// is added and that intersection removed.
    pub fn symmetric_difference_update<'a, I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other: Vec<&T> = other.into_iter().collect();
        let intersection: Vec<T> = other
            .iter()
            .filter(|item| self.contains(item))
            .map(|item| (*item).clone())
            .collect();
        for item in &other {
            self.add((*item).clone())?;
        }
        for item in &intersection {
            self.discard(item)?;
        }
        Ok(())
    }
}
