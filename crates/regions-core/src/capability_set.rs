//! Bitset-backed sets of [`IndexedEnum`] variants
//!
//! A [`CapabilitySet`] stores one bit per variant, 64 variants per word, with
//! the word count sized to the exact cardinality of the enumeration. Every
//! membership operation is a single word access.
//!
//! Readers outside the owner receive a [`CapabilitySnapshot`]: an immutable
//! copy taken at a point in time. Later mutations of the live set never show
//! through a snapshot.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::IndexedEnum;

const WORD_BITS: usize = 64;

/// Mutable set of variants of one enumeration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CapabilitySet<E> {
    words: Vec<u64>,
    _variant: PhantomData<E>,
}

impl<E: IndexedEnum> CapabilitySet<E> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: vec![0; E::COUNT.div_ceil(WORD_BITS)],
            _variant: PhantomData,
        }
    }

    /// Creates a set holding every variant.
    #[must_use]
    pub fn all() -> Self {
        E::iter().collect()
    }

    #[inline]
    fn locate(variant: E) -> (usize, u64) {
        let offset = variant.offset();
        (offset / WORD_BITS, 1u64 << (offset % WORD_BITS))
    }

    /// Returns `true` if `variant` is present.
    #[must_use]
    pub fn contains(&self, variant: E) -> bool {
        let (word, mask) = Self::locate(variant);
        self.words[word] & mask != 0
    }

    /// Returns `true` if every variant yielded by `variants` is present.
    /// An empty input is trivially contained.
    pub fn contains_all<I>(&self, variants: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        variants.into_iter().all(|variant| self.contains(variant))
    }

    /// Inserts `variant`, returning `true` if it was absent.
    pub fn insert(&mut self, variant: E) -> bool {
        let (word, mask) = Self::locate(variant);
        let old = self.words[word];
        self.words[word] |= mask;
        old & mask == 0
    }

    /// Removes `variant`, returning `true` if it was present.
    pub fn remove_one(&mut self, variant: E) -> bool {
        let (word, mask) = Self::locate(variant);
        let old = self.words[word];
        self.words[word] &= !mask;
        old & mask != 0
    }

    /// Inserts every variant of `variants`.
    ///
    /// Returns `true` if at least one of them was previously absent.
    pub fn add<I>(&mut self, variants: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        variants
            .into_iter()
            .fold(false, |changed, variant| self.insert(variant) | changed)
    }

    /// Removes every variant of `variants`.
    ///
    /// Returns `true` if at least one of them was actually removed.
    pub fn remove<I>(&mut self, variants: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        variants
            .into_iter()
            .fold(false, |changed, variant| self.remove_one(variant) | changed)
    }

    /// Number of variants present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if no variant is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Removes every variant.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Adds every variant of `other`. Returns `true` if `self` changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.merge_words(other, |a, b| a | b)
    }

    /// Keeps only variants also in `other`. Returns `true` if `self` changed.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.merge_words(other, |a, b| a & b)
    }

    /// Removes every variant of `other`. Returns `true` if `self` changed.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        self.merge_words(other, |a, b| a & !b)
    }

    fn merge_words(&mut self, other: &Self, op: impl Fn(u64, u64) -> u64) -> bool {
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let old = *a;
            *a = op(old, *b);
            changed |= old != *a;
        }
        changed
    }

    /// Returns `true` if every variant of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// Returns `true` if `self` and `other` share no variant.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & b == 0)
    }

    /// Iterates present variants in ascending offset order.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            set: self,
            next_offset: 0,
        }
    }

    /// Keys of present variants in ascending offset order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(E::key)
    }

    /// Takes an immutable copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> CapabilitySnapshot<E> {
        CapabilitySnapshot {
            inner: Arc::new(self.clone()),
        }
    }
}

impl<E: IndexedEnum> Default for CapabilitySet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: IndexedEnum> FromIterator<E> for CapabilitySet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add(iter);
        set
    }
}

impl<E: IndexedEnum> Extend<E> for CapabilitySet<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.add(iter);
    }
}

impl<'a, E: IndexedEnum> IntoIterator for &'a CapabilitySet<E> {
    type Item = E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: IndexedEnum> fmt::Debug for CapabilitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<E: IndexedEnum> fmt::Display for CapabilitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, key) in self.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key)?;
        }
        f.write_str("]")
    }
}

/// Iterator over the variants of a [`CapabilitySet`].
pub struct Iter<'a, E> {
    set: &'a CapabilitySet<E>,
    next_offset: usize,
}

impl<E: IndexedEnum> Iterator for Iter<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_offset < E::COUNT {
            let word_idx = self.next_offset / WORD_BITS;
            let remaining = self.set.words[word_idx] >> (self.next_offset % WORD_BITS);
            if remaining == 0 {
                self.next_offset = (word_idx + 1) * WORD_BITS;
                continue;
            }
            let offset = self.next_offset + remaining.trailing_zeros() as usize;
            self.next_offset = offset + 1;
            return E::by_offset(offset);
        }
        None
    }
}

/// Read-only view of a [`CapabilitySet`] taken at one point in time.
///
/// Cloning a snapshot shares the same frozen contents.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CapabilitySnapshot<E> {
    inner: Arc<CapabilitySet<E>>,
}

impl<E: IndexedEnum> CapabilitySnapshot<E> {
    /// Copies the frozen contents into a new mutable set.
    #[must_use]
    pub fn to_set(&self) -> CapabilitySet<E> {
        (*self.inner).clone()
    }
}

impl<E> Deref for CapabilitySnapshot<E> {
    type Target = CapabilitySet<E>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E: IndexedEnum> PartialEq<CapabilitySet<E>> for CapabilitySnapshot<E> {
    fn eq(&self, other: &CapabilitySet<E>) -> bool {
        *self.inner == *other
    }
}

impl<E: IndexedEnum> fmt::Debug for CapabilitySnapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl<E: IndexedEnum> fmt::Display for CapabilitySnapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}
