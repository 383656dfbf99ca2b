//! Iterators over the items of a [`JaggedVec`](crate::JaggedVec).

use std::iter::FusedIterator;

use crate::offsets::Offsets;

/// Iterator over the items of a `JaggedVec`, yielding each item as a slice.
///
/// Created by [`JaggedVec::iter`](crate::JaggedVec::iter) or by
/// [`RangeCursor::range_to`](crate::RangeCursor::range_to).
#[derive(Debug)]
pub struct Iter<'a, T> {
    offsets: &'a [u64],
    values: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    /// Creates an iterator over the items `front..back`.
    pub(crate) fn new(offsets: &'a [u64], values: &'a [T], front: usize, back: usize) -> Self {
        debug_assert!(front <= back && back < offsets.len());
        Iter {
            offsets,
            values,
            front,
            back,
        }
    }

    #[inline]
    fn item(&self, index: usize) -> &'a [T] {
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        &self.values[start..end]
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            offsets: self.offsets,
            values: self.values,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.front < self.back {
            let item = self.item(self.front);
            self.front += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<&'a [T]> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn last(mut self) -> Option<&'a [T]> {
        self.next_back()
    }

    fn count(self) -> usize {
        self.len()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a [T]> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.item(self.back))
        } else {
            None
        }
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a [T]> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Iterator over the items of a `JaggedVec`, yielding each item as a mutable
/// slice.
///
/// Created by [`JaggedVec::iter_mut`](crate::JaggedVec::iter_mut).
#[derive(Debug)]
pub struct IterMut<'a, T> {
    offsets: &'a [u64],
    /// Values of the items `front..back` not yet handed out.
    values: &'a mut [T],
    front: usize,
    back: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(offsets: &'a [u64], values: &'a mut [T], front: usize, back: usize) -> Self {
        debug_assert!(front <= back && back < offsets.len());
        let start = offsets[front] as usize;
        let end = offsets[back] as usize;
        IterMut {
            offsets,
            values: &mut values[start..end],
            front,
            back,
        }
    }

    #[inline]
    fn item_len(&self, index: usize) -> usize {
        (self.offsets[index + 1] - self.offsets[index]) as usize
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<&'a mut [T]> {
        if self.front < self.back {
            let len = self.item_len(self.front);
            let (item, rest) = std::mem::take(&mut self.values).split_at_mut(len);
            self.values = rest;
            self.front += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut [T]> {
        if self.front < self.back {
            let len = self.item_len(self.back - 1);
            let values = std::mem::take(&mut self.values);
            let (rest, item) = values.split_at_mut(values.len() - len);
            self.values = rest;
            self.back -= 1;
            Some(item)
        } else {
            None
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over the items of a `JaggedVec`, yielding each item as a
/// `Vec`.
///
/// Created by the `IntoIterator` implementation of `JaggedVec`.
#[derive(Debug)]
pub struct IntoIter<T> {
    values: std::vec::IntoIter<T>,
    offsets: Offsets,
    index: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(values: Vec<T>, offsets: Offsets) -> Self {
        IntoIter {
            values: values.into_iter(),
            offsets,
            index: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.index < self.offsets.item_count() {
            let len = self.offsets.range_at(self.index).len();
            self.index += 1;
            Some(self.values.by_ref().take(len).collect())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.offsets.item_count() - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
