//! Jagged arrays: sequences of variable-length items stored in two flat buffers.
//!
//! [`JaggedVec`] keeps the elements of all its items in one contiguous values
//! buffer and delimits them with an [`Offsets`] collection, so ragged data
//! such as adjacency lists or grouped records costs two allocations in total
//! rather than one per item. Items are exposed as slices borrowed from the
//! container, either through standard iterators ([`Iter`], [`IterMut`]) or
//! through the random-access cursors [`RangeCursor`] and [`RangeCursorMut`].
//!
//! ```
//! use jagged::JaggedVec;
//!
//! let mut adjacency = JaggedVec::with_capacity(6, 3);
//! adjacency.push([1, 2]);
//! adjacency.push([0, 2]);
//! adjacency.push([0, 1]);
//!
//! let degrees: Vec<usize> = adjacency.iter().map(<[u32]>::len).collect();
//! assert_eq!(degrees, vec![2, 2, 2]);
//! assert_eq!(adjacency.end() - adjacency.begin(), 3);
//! ```

pub mod cursor;
pub mod iter;
pub mod offsets;
pub mod vector;


pub use cursor::{RangeCursor, RangeCursorMut};
pub use iter::{IntoIter, Iter, IterMut};
pub use offsets::{Offsets, OffsetsIter};
pub use vector::JaggedVec;
