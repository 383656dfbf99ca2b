//! Random-access cursors over the items of a [`JaggedVec`](crate::JaggedVec).
//!
//! A cursor is a position in `0..=len` over the item boundaries. Moving it is
//! O(1), and dereferencing it at position `i` yields the slice between
//! offsets `i` and `i + 1`. The position `len` is the end sentinel: it can be
//! reached and compared against, but not dereferenced.
//!
//! Cursors borrow the container, so they can never observe a reallocated
//! buffer. Moving outside `0..=len` or dereferencing the end sentinel panics;
//! the `try_*` variants report a `CursorOutOfRange` error instead.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use jagged_common::{Error, Result};

use crate::iter::Iter;

/// Returns `pos` moved by `n`, checked against `0..=end`.
fn moved(pos: usize, n: isize, end: usize) -> Result<usize> {
    pos.checked_add_signed(n)
        .filter(|&target| target <= end)
        .ok_or_else(|| Error::cursor_out_of_range((pos as isize).saturating_add(n), end))
}

/// Returns the item at `pos`, or an error at or past the end sentinel.
fn item_at<'v, T>(offsets: &[u64], values: &'v [T], pos: usize) -> Result<&'v [T]> {
    let end = offsets.len() - 1;
    if pos < end {
        Ok(&values[offsets[pos] as usize..offsets[pos + 1] as usize])
    } else {
        Err(Error::cursor_out_of_range(pos as isize, end))
    }
}

/// A read-only random-access cursor over the items of a `JaggedVec`.
///
/// Obtained from [`JaggedVec::begin`](crate::JaggedVec::begin) and
/// [`JaggedVec::end`](crate::JaggedVec::end).
///
/// # Examples
///
/// ```
/// use jagged::JaggedVec;
///
/// let mut v = JaggedVec::new();
/// v.push([1, 2]);
/// v.push([]);
/// v.push([3]);
///
/// let mut cursor = v.begin();
/// assert_eq!(cursor.get(), &[1, 2]);
/// cursor += 2;
/// assert_eq!(cursor.get(), &[3]);
/// cursor.increment();
/// assert_eq!(cursor, v.end());
/// assert_eq!(v.end() - v.begin(), 3);
/// ```
///
/// A cursor keeps the container borrowed, so the container cannot be appended
/// to while the cursor is in use:
///
/// ```compile_fail
/// use jagged::JaggedVec;
///
/// let mut v = JaggedVec::new();
/// v.push([1, 2]);
/// let cursor = v.begin();
/// v.push([3]);
/// assert_eq!(cursor.get(), &[1, 2]);
/// ```
#[derive(Debug)]
pub struct RangeCursor<'a, T> {
    offsets: &'a [u64],
    values: &'a [T],
    pos: usize,
}

impl<'a, T> RangeCursor<'a, T> {
    pub(crate) fn new(offsets: &'a [u64], values: &'a [T], pos: usize) -> Self {
        debug_assert!(pos < offsets.len());
        RangeCursor {
            offsets,
            values,
            pos,
        }
    }

    /// Returns the index of the item the cursor points at.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the position of the end sentinel, which is the number of items.
    #[inline]
    pub fn end_position(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the cursor is at the end sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos == self.end_position()
    }

    /// Moves the cursor to the next item.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel.
    #[track_caller]
    pub fn increment(&mut self) {
        self.advance(1);
    }

    /// Moves the cursor to the previous item.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the first item.
    #[track_caller]
    pub fn decrement(&mut self) {
        self.advance(-1);
    }

    /// Moves the cursor by `n` items, backwards if `n` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the target position is outside `0..=len`.
    #[track_caller]
    pub fn advance(&mut self, n: isize) {
        if let Err(e) = self.try_advance(n) {
            panic!("{e}");
        }
    }

    /// Moves the cursor by `n` items, backwards if `n` is negative.
    ///
    /// # Errors
    ///
    /// Returns a `CursorOutOfRange` error if the target position is outside
    /// `0..=len`; the cursor does not move in that case.
    pub fn try_advance(&mut self, n: isize) -> Result<()> {
        self.pos = moved(self.pos, n, self.end_position())?;
        Ok(())
    }

    /// Returns the signed number of items from `self` to `other`.
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different containers.
    #[track_caller]
    pub fn distance_to(&self, other: &RangeCursor<'_, T>) -> isize {
        assert!(
            self.same_buffers(other),
            "cursors belong to different containers"
        );
        other.pos as isize - self.pos as isize
    }

    /// Returns the item the cursor points at.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel.
    #[track_caller]
    pub fn get(&self) -> &'a [T] {
        match self.try_get() {
            Ok(item) => item,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the item the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns a `CursorOutOfRange` error if the cursor is at the end sentinel.
    pub fn try_get(&self) -> Result<&'a [T]> {
        item_at(self.offsets, self.values, self.pos)
    }

    /// Returns the item `n` positions away from the cursor.
    ///
    /// # Panics
    ///
    /// Panics if there is no item at that position.
    #[track_caller]
    pub fn at(&self, n: isize) -> &'a [T] {
        let mut cursor = *self;
        cursor.advance(n);
        cursor.get()
    }

    /// Returns an iterator over the items from this cursor up to `end`,
    /// exclusive.
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different containers or `end` comes
    /// before `self`.
    #[track_caller]
    pub fn range_to(&self, end: &RangeCursor<'a, T>) -> Iter<'a, T> {
        assert!(
            self.distance_to(end) >= 0,
            "range end precedes range start"
        );
        Iter::new(self.offsets, self.values, self.pos, end.pos)
    }

    fn same_buffers(&self, other: &RangeCursor<'_, T>) -> bool {
        std::ptr::eq(self.offsets, other.offsets) && std::ptr::eq(self.values, other.values)
    }
}

impl<T> Clone for RangeCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RangeCursor<'_, T> {}

impl<T> PartialEq for RangeCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.same_buffers(other)
    }
}

impl<T> Eq for RangeCursor<'_, T> {}

impl<T> PartialOrd for RangeCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_buffers(other) {
            Some(self.pos.cmp(&other.pos))
        } else {
            None
        }
    }
}

impl<T> AddAssign<isize> for RangeCursor<'_, T> {
    #[track_caller]
    fn add_assign(&mut self, n: isize) {
        self.advance(n);
    }
}

impl<T> SubAssign<isize> for RangeCursor<'_, T> {
    #[track_caller]
    fn sub_assign(&mut self, n: isize) {
        self.advance(-n);
    }
}

impl<T> Add<isize> for RangeCursor<'_, T> {
    type Output = Self;

    #[track_caller]
    fn add(mut self, n: isize) -> Self {
        self.advance(n);
        self
    }
}

impl<T> Sub<isize> for RangeCursor<'_, T> {
    type Output = Self;

    #[track_caller]
    fn sub(mut self, n: isize) -> Self {
        self.advance(-n);
        self
    }
}

impl<T> Sub for RangeCursor<'_, T> {
    type Output = isize;

    #[track_caller]
    fn sub(self, rhs: Self) -> isize {
        rhs.distance_to(&self)
    }
}

/// A random-access cursor over the items of a `JaggedVec` which allows
/// mutating the elements of the item it points at.
///
/// Obtained from [`JaggedVec::begin_mut`](crate::JaggedVec::begin_mut). The
/// length of an item cannot change through the cursor.
#[derive(Debug)]
pub struct RangeCursorMut<'a, T> {
    offsets: &'a [u64],
    values: &'a mut [T],
    pos: usize,
}

impl<'a, T> RangeCursorMut<'a, T> {
    pub(crate) fn new(offsets: &'a [u64], values: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos < offsets.len());
        RangeCursorMut {
            offsets,
            values,
            pos,
        }
    }

    /// Returns the index of the item the cursor points at.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the position of the end sentinel, which is the number of items.
    #[inline]
    pub fn end_position(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the cursor is at the end sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos == self.end_position()
    }

    /// Returns the number of items between the cursor and the end sentinel.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end_position() - self.pos
    }

    /// Moves the cursor to the next item.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel.
    #[track_caller]
    pub fn increment(&mut self) {
        self.advance(1);
    }

    /// Moves the cursor to the previous item.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the first item.
    #[track_caller]
    pub fn decrement(&mut self) {
        self.advance(-1);
    }

    /// Moves the cursor by `n` items, backwards if `n` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the target position is outside `0..=len`.
    #[track_caller]
    pub fn advance(&mut self, n: isize) {
        if let Err(e) = self.try_advance(n) {
            panic!("{e}");
        }
    }

    /// Moves the cursor by `n` items, backwards if `n` is negative.
    ///
    /// # Errors
    ///
    /// Returns a `CursorOutOfRange` error if the target position is outside
    /// `0..=len`; the cursor does not move in that case.
    pub fn try_advance(&mut self, n: isize) -> Result<()> {
        self.pos = moved(self.pos, n, self.end_position())?;
        Ok(())
    }

    /// Returns the item the cursor points at.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel.
    #[track_caller]
    pub fn get(&self) -> &[T] {
        match self.try_get() {
            Ok(item) => item,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the item the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns a `CursorOutOfRange` error if the cursor is at the end sentinel.
    pub fn try_get(&self) -> Result<&[T]> {
        item_at(self.offsets, &*self.values, self.pos)
    }

    /// Returns the item the cursor points at for element mutation.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel.
    #[track_caller]
    pub fn get_mut(&mut self) -> &mut [T] {
        match self.try_get_mut() {
            Ok(item) => item,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the item the cursor points at for element mutation.
    ///
    /// # Errors
    ///
    /// Returns a `CursorOutOfRange` error if the cursor is at the end sentinel.
    pub fn try_get_mut(&mut self) -> Result<&mut [T]> {
        let end = self.end_position();
        if self.pos < end {
            let start = self.offsets[self.pos] as usize;
            let stop = self.offsets[self.pos + 1] as usize;
            Ok(&mut self.values[start..stop])
        } else {
            Err(Error::cursor_out_of_range(self.pos as isize, end))
        }
    }

    /// Reborrows this cursor as a read-only cursor at the same position.
    pub fn as_cursor(&self) -> RangeCursor<'_, T> {
        RangeCursor::new(self.offsets, &*self.values, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use jagged_common::ErrorKind;

    use crate::JaggedVec;

    fn sample() -> JaggedVec<i32> {
        let mut v = JaggedVec::with_capacity(10, 10);
        v.push([0]);
        v.push([1, 2, 3]);
        v.push([]);
        v.push([4, 5]);
        v.push([6]);
        v
    }

    #[test]
    fn test_begin_end() {
        let v = sample();
        let begin = v.begin();
        let end = v.end();
        assert_eq!(begin.position(), 0);
        assert_eq!(end.position(), 5);
        assert_eq!(end.end_position(), 5);
        assert!(end.is_end());
        assert!(!begin.is_end());
        assert_eq!(end - begin, 5);
        assert_eq!(begin.distance_to(&end), 5);
        assert_eq!(end.distance_to(&begin), -5);
        assert!(begin < end);
    }

    #[test]
    fn test_walk_forward() {
        let v = sample();
        let mut cursor = v.begin();
        let mut items = Vec::new();
        while cursor != v.end() {
            items.push(cursor.get().to_vec());
            cursor.increment();
        }
        assert_eq!(items, vec![vec![0], vec![1, 2, 3], vec![], vec![4, 5], vec![6]]);
    }

    #[test]
    fn test_walk_backward() {
        let v = sample();
        let mut cursor = v.end();
        let mut lens = Vec::new();
        while cursor != v.begin() {
            cursor.decrement();
            lens.push(cursor.get().len());
        }
        assert_eq!(lens, vec![1, 2, 0, 3, 1]);
    }

    #[test]
    fn test_random_access() {
        let v = sample();
        let begin = v.begin();
        assert_eq!((begin + 3).get(), &[4, 5]);
        assert_eq!(begin.at(1), &[1, 2, 3]);
        assert_eq!((v.end() - 1).get(), &[6]);
        assert_eq!((begin + 4).at(-4), &[0]);

        let mut cursor = begin;
        cursor += 4;
        cursor -= 2;
        assert_eq!(cursor.position(), 2);
        assert!(cursor.get().is_empty());
        assert_eq!(begin.position(), 0);
    }

    #[test]
    fn test_range_to() {
        let v = sample();
        let items: Vec<&[i32]> = (v.begin() + 1).range_to(&(v.end() - 1)).collect();
        let expected: [&[i32]; 3] = [&[1, 2, 3], &[], &[4, 5]];
        assert_eq!(items, expected);
        assert_eq!(v.begin().range_to(&v.end()).count(), 5);
        assert_eq!(v.end().range_to(&v.end()).count(), 0);
    }

    #[test]
    fn test_binary_search_by_cursor() {
        let mut v = JaggedVec::new();
        for len in [0, 1, 1, 3, 4, 4, 7] {
            v.push(0..len);
        }
        let mut lo = v.begin();
        let mut hi = v.end();
        while lo != hi {
            let mid = lo + (hi - lo) / 2;
            if mid.get().len() < 4 {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        assert_eq!(lo.position(), 4);
    }

    #[test]
    fn test_empty_container() {
        let v = JaggedVec::<u8>::with_capacity(0, 0);
        assert_eq!(v.begin(), v.end());
        assert_eq!(v.end() - v.begin(), 0);
        assert!(v.begin().is_end());
        assert!(v.begin().try_get().is_err());
    }

    #[test]
    fn test_cursors_of_different_containers() {
        let a = sample();
        let b = sample();
        assert_ne!(a.begin(), b.begin());
        assert_eq!(a.begin().partial_cmp(&b.begin()), None);
        assert_eq!(a.begin(), a.begin());
    }

    #[test]
    #[should_panic(expected = "different containers")]
    fn test_distance_across_containers_panics() {
        let a = sample();
        let b = sample();
        let _ = a.end() - b.begin();
    }

    #[test]
    fn test_try_advance_out_of_range() {
        let v = sample();
        let mut cursor = v.begin();
        let err = cursor.try_advance(-1).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::CursorOutOfRange {
                position: -1,
                len: 5
            }
        ));
        assert_eq!(cursor.position(), 0);

        assert!(cursor.try_advance(6).is_err());
        cursor.try_advance(5).unwrap();
        assert!(cursor.is_end());
        assert!(cursor.try_advance(1).is_err());
    }

    #[test]
    #[should_panic(expected = "outside of 0..=5")]
    fn test_get_at_end_panics() {
        let v = sample();
        v.end().get();
    }

    #[test]
    #[should_panic]
    fn test_increment_past_end_panics() {
        let v = sample();
        let mut cursor = v.end();
        cursor.increment();
    }

    #[test]
    fn test_cursor_mut() {
        let mut v = sample();
        let mut cursor = v.begin_mut();
        assert_eq!(cursor.remaining(), 5);
        while !cursor.is_end() {
            let pos = cursor.position() as i32;
            cursor.get_mut().iter_mut().for_each(|x| *x = -pos);
            cursor.increment();
        }
        assert!(cursor.try_get_mut().is_err());
        cursor.decrement();
        assert_eq!(cursor.get(), &[-4]);
        assert_eq!(cursor.as_cursor().position(), 4);

        assert_eq!(v.values(), &[0, -1, -1, -1, -3, -3, -4]);
        assert_eq!(v.offsets().as_slice(), &[0, 1, 4, 4, 6, 7]);
    }

    #[test]
    fn test_cursor_mut_advance() {
        let mut v = sample();
        let mut cursor = v.begin_mut();
        cursor.advance(3);
        cursor.get_mut().swap(0, 1);
        assert!(cursor.try_advance(3).is_err());
        cursor.advance(-2);
        cursor.get_mut()[2] = 30;
        assert_eq!(cursor.remaining(), 4);
        assert_eq!(&v[3], &[5, 4]);
        assert_eq!(&v[1], &[1, 2, 30]);
    }
}
