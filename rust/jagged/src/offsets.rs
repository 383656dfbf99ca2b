//! Item boundaries of a jagged vector.

use std::ops::Range;

use jagged_common::{Error, Result, verify_arg};

/// A collection of offsets delimiting variable-length items.
///
/// Stores a sequence of monotonically non-decreasing offsets, where each pair of
/// adjacent offsets defines the range of a single item. The first offset is
/// always zero, and the collection always holds at least that one offset, so
/// `n` items take `n + 1` offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Offsets(Vec<u64>);

impl Offsets {
    /// Creates a new empty `Offsets` collection.
    ///
    /// The resulting collection will have a single offset at position 0.
    pub fn new() -> Offsets {
        Self::with_capacity(0)
    }

    /// Creates a new `Offsets` collection with the specified capacity.
    ///
    /// The resulting collection will have a single offset at position 0,
    /// and space reserved for `capacity` additional offsets.
    pub fn with_capacity(capacity: usize) -> Offsets {
        let mut buf = Vec::with_capacity(capacity + 1);
        buf.push(0u64);
        Offsets(buf)
    }

    /// Creates a new `Offsets` collection from raw offsets.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error unless `offsets` is non-empty, starts
    /// at zero and is non-decreasing.
    pub fn from_vec(offsets: Vec<u64>) -> Result<Offsets> {
        verify_arg!(offsets, offsets.first() == Some(&0));
        verify_arg!(offsets, offsets.windows(2).all(|w| w[0] <= w[1]));
        Ok(Offsets(offsets))
    }

    /// Returns the number of items represented by these offsets.
    ///
    /// This is one less than the number of stored offsets.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns `true` if the collection contains no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Returns the number of items the collection can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity() - 1
    }

    /// Returns a reference to the underlying slice of offsets.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Returns the first offset, which is always zero.
    #[inline]
    pub fn first(&self) -> u64 {
        self.0[0]
    }

    /// Returns the last offset, which marks the end of the last item.
    #[inline]
    pub fn last(&self) -> u64 {
        self.0[self.0.len() - 1]
    }

    /// Returns an iterator over the ranges of each item.
    #[inline]
    pub fn ranges(&self) -> OffsetsIter<'_> {
        OffsetsIter::new(self.as_slice())
    }

    /// Returns the range of the item at the given logical index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.item_count()`.
    #[inline]
    pub fn range_at(&self, index: usize) -> Range<usize> {
        let offsets = self.as_slice();
        offsets[index] as usize..offsets[index + 1] as usize
    }

    /// Adds a new offset to the end of the collection.
    ///
    /// # Panics
    ///
    /// Panics if `next_offset` is less than the current last offset.
    #[inline]
    pub fn push_offset(&mut self, next_offset: u64) {
        assert!(next_offset >= self.last());
        self.0.push(next_offset);
    }

    /// Adds a new offset by incrementing the last offset by the given length.
    #[inline]
    pub fn push_length(&mut self, len: usize) {
        let last = self.last();
        self.0.push(last + len as u64);
    }

    /// Reserves room for at least `additional` more items.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    /// Tries to reserve room for at least `additional` more items.
    ///
    /// # Errors
    ///
    /// Returns a `ResourceExhausted` error if the allocation fails; the
    /// collection is left untouched in that case.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.0
            .try_reserve(additional)
            .map_err(|e| Error::resource_exhausted("offsets", additional, e))
    }

    /// Consumes the `Offsets` collection and returns the raw offsets,
    /// including the leading zero.
    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for Offsets {
    type Target = [u64];

    /// Provides direct access to the underlying offset slice.
    #[inline]
    fn deref(&self) -> &[u64] {
        self.as_slice()
    }
}

impl TryFrom<Vec<u64>> for Offsets {
    type Error = Error;

    fn try_from(offsets: Vec<u64>) -> Result<Offsets> {
        Offsets::from_vec(offsets)
    }
}

/// Iterator over the ranges of items defined by the offsets.
#[derive(Debug, Clone)]
pub struct OffsetsIter<'a> {
    offsets: &'a [u64],
    index: usize,
}

impl<'a> OffsetsIter<'a> {
    pub fn new(offsets: &'a [u64]) -> Self {
        Self { offsets, index: 0 }
    }
}

impl Iterator for OffsetsIter<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index + 1 < self.offsets.len() {
            let start = self.offsets[self.index];
            let end = self.offsets[self.index + 1];
            self.index += 1;
            Some(start as usize..end as usize)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.offsets.len().saturating_sub(self.index + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OffsetsIter<'_> {}
