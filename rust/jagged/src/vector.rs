//! A vector of variable-length items backed by two flat buffers.

use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use jagged_common::{Error, Result, verify_arg};
use log::{debug, trace};

use crate::cursor::{RangeCursor, RangeCursorMut};
use crate::iter::{IntoIter, Iter, IterMut};
use crate::offsets::Offsets;

/// A sequence of variable-length items stored in two flat buffers.
///
/// All elements of all items are concatenated into a single `values` buffer,
/// and an [`Offsets`] collection records the boundaries between them: item `i`
/// is `values[offsets[i]..offsets[i + 1]]`. Appending an item never allocates
/// per item; it moves the item's elements onto the end of `values` and pushes
/// one new boundary.
///
/// Items are handed out as plain slices borrowed from the container, so any
/// view, iterator or cursor keeps the container borrowed and a `push` cannot
/// happen while one is alive.
///
/// # Examples
///
/// ```
/// use jagged::JaggedVec;
///
/// let mut v = JaggedVec::with_capacity(10, 4);
/// v.push([0]);
/// v.push([1, 2, 3]);
/// v.push([]);
///
/// assert_eq!(v.len(), 3);
/// assert_eq!(&v[1], &[1, 2, 3]);
/// assert!(v[2].is_empty());
/// assert_eq!(v.offsets().as_slice(), &[0, 1, 4, 4]);
/// ```
#[derive(Clone)]
pub struct JaggedVec<T> {
    /// Elements of every item, concatenated.
    values: Vec<T>,
    /// Item boundaries into `values`.
    offsets: Offsets,
}

impl<T> JaggedVec<T> {
    /// Creates a new empty `JaggedVec`.
    pub fn new() -> JaggedVec<T> {
        Self::with_capacity(0, 0)
    }

    /// Creates a new empty `JaggedVec` with room for `elements` values spread
    /// over `items` items.
    ///
    /// Both numbers are hints: the buffers grow past them as needed.
    pub fn with_capacity(elements: usize, items: usize) -> JaggedVec<T> {
        JaggedVec {
            values: Vec::with_capacity(elements),
            offsets: Offsets::with_capacity(items),
        }
    }

    /// Creates a `JaggedVec` from an existing values buffer and its offsets.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the last offset does not match
    /// the number of values.
    pub fn try_from_parts(values: Vec<T>, offsets: Offsets) -> Result<JaggedVec<T>> {
        verify_arg!(offsets, offsets.last() == values.len() as u64);
        Ok(JaggedVec { values, offsets })
    }

    /// Consumes the `JaggedVec` and returns its values buffer and offsets.
    pub fn into_parts(self) -> (Vec<T>, Offsets) {
        (self.values, self.offsets)
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.item_count()
    }

    /// Returns `true` if the `JaggedVec` contains no items.
    ///
    /// A `JaggedVec` holding only empty items is not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the total number of values across all items.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.values.len()
    }

    /// Returns the length of the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn item_len(&self, index: usize) -> usize {
        self.offsets.range_at(index).len()
    }

    /// Returns the capacity of both buffers as `(elements, items)`.
    pub fn capacity(&self) -> (usize, usize) {
        (self.values.capacity(), self.offsets.capacity())
    }

    /// Returns the concatenated values of all items.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the concatenated values of all items for in-place mutation.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Returns the item boundaries.
    #[inline]
    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    /// Returns the item at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&[T]> {
        if index < self.len() {
            Some(&self.values[self.offsets.range_at(index)])
        } else {
            None
        }
    }

    /// Returns the item at `index` for element mutation, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [T]> {
        if index < self.len() {
            let range = self.offsets.range_at(index);
            Some(&mut self.values[range])
        } else {
            None
        }
    }

    /// Returns the first item, or `None` if there are no items.
    pub fn first(&self) -> Option<&[T]> {
        self.get(0)
    }

    /// Returns the last item, or `None` if there are no items.
    pub fn last(&self) -> Option<&[T]> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Appends a new item made of the elements produced by `items`.
    ///
    /// The input may be empty, which appends a zero-length item. Returns the
    /// index of the new item.
    ///
    /// Either buffer may be reallocated. If `items` panics while producing
    /// elements, the elements moved so far are dropped and the `JaggedVec` is
    /// left as it was before the call.
    ///
    /// # Panics
    ///
    /// Panics (or aborts) if either buffer fails to grow, like [`Vec::push`].
    pub fn push<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let index = self.len();
        let capacity = self.capacity();

        // The boundary slot is reserved up front so that committing the item
        // after the values are in cannot fail.
        self.offsets.reserve(1);
        let mut pending = PendingItem::new(&mut self.values);
        pending.values.extend(items);
        let count = pending.commit();
        self.offsets.push_length(count);

        self.trace_growth(capacity);
        index
    }

    /// Appends a new item holding clones of the elements of `items`.
    ///
    /// Returns the index of the new item.
    pub fn push_slice(&mut self, items: &[T]) -> usize
    where
        T: Clone,
    {
        let index = self.len();
        let capacity = self.capacity();

        self.offsets.reserve(1);
        let mut pending = PendingItem::new(&mut self.values);
        pending.values.extend_from_slice(items);
        let count = pending.commit();
        self.offsets.push_length(count);

        self.trace_growth(capacity);
        index
    }

    /// Appends a new item made of the elements produced by `items`, reporting
    /// allocation failures instead of panicking.
    ///
    /// Returns the index of the new item.
    ///
    /// # Errors
    ///
    /// Returns a `ResourceExhausted` error if either buffer fails to grow. The
    /// `JaggedVec` is then left exactly as it was before the call; the elements
    /// already taken from `items` are dropped.
    pub fn try_push<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let index = self.len();
        let capacity = self.capacity();

        self.offsets
            .try_reserve(1)
            .inspect_err(|e| debug!("rejected jagged item #{index}: {e}"))?;

        let items = items.into_iter();
        let mut pending = PendingItem::new(&mut self.values);
        try_reserve_values(&mut *pending.values, items.size_hint().0, index)?;
        for value in items {
            if pending.values.len() == pending.values.capacity() {
                try_reserve_values(&mut *pending.values, 1, index)?;
            }
            pending.values.push(value);
        }
        let count = pending.commit();
        self.offsets.push_length(count);

        self.trace_growth(capacity);
        Ok(index)
    }

    /// Returns a cursor positioned at the first item.
    pub fn begin(&self) -> RangeCursor<'_, T> {
        RangeCursor::new(&self.offsets, &self.values, 0)
    }

    /// Returns a cursor positioned at the end sentinel, one past the last item.
    ///
    /// `end() - begin()` is the number of items.
    pub fn end(&self) -> RangeCursor<'_, T> {
        RangeCursor::new(&self.offsets, &self.values, self.len())
    }

    /// Returns a cursor positioned at the first item which allows mutating the
    /// elements of the items it visits.
    pub fn begin_mut(&mut self) -> RangeCursorMut<'_, T> {
        RangeCursorMut::new(&self.offsets, &mut self.values, 0)
    }

    /// Returns an iterator over the items.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.offsets, &self.values, 0, self.len())
    }

    /// Returns an iterator over the items which allows mutating their elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len();
        IterMut::new(&self.offsets, &mut self.values, 0, len)
    }

    /// Verifies the internal consistency of the `JaggedVec`.
    ///
    /// # Panics
    ///
    /// Panics if the offsets do not start at zero, decrease anywhere, or do
    /// not end at the number of values.
    pub fn verify(&self) {
        let offsets = self.offsets.as_slice();
        assert_eq!(offsets[0], 0);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(self.offsets.last(), self.values.len() as u64);
        assert_eq!(self.iter().map(<[T]>::len).sum::<usize>(), self.values.len());
    }

    fn trace_growth(&self, before: (usize, usize)) {
        let after = self.capacity();
        if after.0 != before.0 {
            trace!("jagged values buffer grew from {} to {}", before.0, after.0);
        }
        if after.1 != before.1 {
            trace!("jagged offsets buffer grew from {} to {}", before.1, after.1);
        }
    }
}

fn try_reserve_values<T>(values: &mut Vec<T>, additional: usize, index: usize) -> Result<()> {
    values.try_reserve(additional).map_err(|e| {
        let err = Error::resource_exhausted("values", additional, e);
        debug!("rolling back jagged item #{index}: {err}");
        err
    })
}

/// Values of an item being appended.
///
/// Dropping a `PendingItem` without committing it truncates the values buffer
/// back to where the item started.
struct PendingItem<'a, T> {
    values: &'a mut Vec<T>,
    start: usize,
}

impl<'a, T> PendingItem<'a, T> {
    fn new(values: &'a mut Vec<T>) -> Self {
        let start = values.len();
        PendingItem { values, start }
    }

    /// Keeps the appended values and returns how many there are.
    fn commit(self) -> usize {
        let count = self.values.len() - self.start;
        std::mem::forget(self);
        count
    }
}

impl<T> Drop for PendingItem<'_, T> {
    fn drop(&mut self) {
        self.values.truncate(self.start);
    }
}

impl<T> Default for JaggedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for JaggedVec<T> {
    type Output = [T];

    fn index(&self, index: usize) -> &[T] {
        &self.values[self.offsets.range_at(index)]
    }
}

impl<T> IndexMut<usize> for JaggedVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut [T] {
        let range = self.offsets.range_at(index);
        &mut self.values[range]
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for JaggedVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for JaggedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offsets == other.offsets && self.values == other.values
    }
}

impl<T: Eq> Eq for JaggedVec<T> {}

impl<T: Hash> Hash for JaggedVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offsets.hash(state);
        self.values.hash(state);
    }
}

impl<T, I> Extend<I> for JaggedVec<T>
where
    I: IntoIterator<Item = T>,
{
    fn extend<It: IntoIterator<Item = I>>(&mut self, iter: It) {
        let iter = iter.into_iter();
        self.offsets.reserve(iter.size_hint().0);
        for items in iter {
            self.push(items);
        }
    }
}

impl<'a, T> IntoIterator for &'a JaggedVec<T> {
    type Item = &'a [T];
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut JaggedVec<T> {
    type Item = &'a mut [T];
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for JaggedVec<T> {
    type Item = Vec<T>;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.values, self.offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let v = JaggedVec::<u32>::new();
        assert!(v.is_empty());
        assert_eq!(v.len(), 0);
        assert_eq!(v.total_len(), 0);
        assert_eq!(v.offsets().as_slice(), &[0]);
        v.verify();
    }

    #[test]
    fn test_with_capacity() {
        let v = JaggedVec::<u32>::with_capacity(10, 5);
        assert!(v.is_empty());
        let (elements, items) = v.capacity();
        assert!(elements >= 10);
        assert!(items >= 5);
    }

    #[test]
    fn test_push_returns_index() {
        let mut v = JaggedVec::new();
        assert_eq!(v.push([1, 2]), 0);
        assert_eq!(v.push([]), 1);
        assert_eq!(v.push_slice(&[3]), 2);
        assert_eq!(v.try_push(vec![4, 5, 6]).unwrap(), 3);
        assert_eq!(v.offsets().as_slice(), &[0, 2, 2, 3, 6]);
        v.verify();
    }

    #[test]
    fn test_push_beyond_capacity_hints() {
        let mut v = JaggedVec::with_capacity(1, 1);
        for i in 0..100u32 {
            v.push(0..i);
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v.total_len(), (0..100).sum::<u32>() as usize);
        assert_eq!(&v[99], (0..99).collect::<Vec<_>>().as_slice());
        v.verify();
    }

    #[test]
    fn test_get() {
        let mut v = JaggedVec::new();
        v.push(["a", "b"]);
        v.push([]);
        assert_eq!(v.get(0), Some(&["a", "b"][..]));
        assert_eq!(v.get(1), Some(&[][..]));
        assert_eq!(v.get(2), None);
        assert_eq!(v.first(), Some(&["a", "b"][..]));
        assert_eq!(v.last(), Some(&[][..]));
        assert_eq!(v.item_len(0), 2);
        assert_eq!(v.item_len(1), 0);
    }

    #[test]
    fn test_first_last_empty() {
        let v = JaggedVec::<u8>::new();
        assert_eq!(v.first(), None);
        assert_eq!(v.last(), None);
    }

    #[test]
    fn test_get_mut() {
        let mut v = JaggedVec::new();
        v.push([1, 2]);
        v.push([3]);
        v.get_mut(0).unwrap()[1] = 20;
        v[1][0] = 30;
        assert!(v.get_mut(2).is_none());
        assert_eq!(v.values(), &[1, 20, 30]);
        assert_eq!(v.offsets().as_slice(), &[0, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let mut v = JaggedVec::new();
        v.push([1]);
        let _ = &v[1];
    }

    #[test]
    fn test_values_mut() {
        let mut v = JaggedVec::new();
        v.push([1, 2]);
        v.push([3]);
        v.values_mut().iter_mut().for_each(|x| *x *= 10);
        assert_eq!(&v[0], &[10, 20]);
        assert_eq!(&v[1], &[30]);
    }

    #[test]
    fn test_from_parts() {
        let offsets = Offsets::from_vec(vec![0, 1, 4, 4]).unwrap();
        let v = JaggedVec::try_from_parts(vec![0, 1, 2, 3], offsets).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(&v[1], &[1, 2, 3]);
        v.verify();

        let (values, offsets) = v.into_parts();
        assert_eq!(values, vec![0, 1, 2, 3]);
        assert_eq!(offsets.as_slice(), &[0, 1, 4, 4]);
    }

    #[test]
    fn test_from_parts_rejects_mismatch() {
        let offsets = Offsets::from_vec(vec![0, 2]).unwrap();
        let err = JaggedVec::try_from_parts(vec![1, 2, 3], offsets).unwrap_err();
        assert!(err.to_string().contains("offsets"));
    }

    #[test]
    fn test_try_push_capacity_overflow_rolls_back() {
        let mut v = JaggedVec::new();
        v.push([1u8, 2]);
        v.push([3u8]);
        let before = v.clone();

        let err = v.try_push(std::iter::repeat_n(7u8, usize::MAX)).unwrap_err();
        assert!(err.is_resource_exhausted());
        assert_eq!(v, before);
        v.verify();

        assert_eq!(v.try_push([4u8]).unwrap(), 2);
        assert_eq!(v.values(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_try_push_without_size_hint() {
        let mut v = JaggedVec::with_capacity(0, 0);
        let evens = (0..50u32).filter(|x| x % 2 == 0);
        v.try_push(evens).unwrap();
        assert_eq!(v.item_len(0), 25);
        v.verify();
    }

    #[test]
    fn test_panicking_input_rolls_back() {
        let mut v = JaggedVec::new();
        v.push([String::from("a")]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            v.push((0..5).map(|i| {
                if i == 3 {
                    panic!("input failed");
                }
                i.to_string()
            }));
        }));
        assert!(result.is_err());
        assert_eq!(v.len(), 1);
        assert_eq!(v.values(), &["a".to_string()]);
        v.verify();
    }

    #[test]
    fn test_extend() {
        let mut v = JaggedVec::new();
        v.extend([vec![1], vec![], vec![2, 3]]);
        v.extend(std::iter::once(4..6));
        assert_eq!(v.offsets().as_slice(), &[0, 1, 1, 3, 5]);
        assert_eq!(v.values(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_eq_and_hash() {
        use std::collections::HashSet;

        let mut a = JaggedVec::new();
        a.push([1, 2]);
        a.push([3]);
        let mut b = JaggedVec::with_capacity(100, 100);
        b.push([1, 2]);
        b.push([3]);
        let mut c = JaggedVec::new();
        c.push([1]);
        c.push([2, 3]);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug() {
        let mut v = JaggedVec::new();
        v.push([1, 2]);
        v.push([]);
        assert_eq!(format!("{v:?}"), "[[1, 2], []]");
    }

    #[test]
    fn test_into_iter_by_value() {
        let mut v = JaggedVec::new();
        v.push([String::from("x")]);
        v.push([]);
        v.push([String::from("y"), String::from("z")]);
        let items: Vec<Vec<String>> = v.into_iter().collect();
        assert_eq!(items, vec![vec!["x"], vec![], vec!["y", "z"]]);
    }
}
