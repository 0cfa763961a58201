//! This crate provides a doubly-linked list with owned nodes, implemented as a
//! cyclic list around a ghost node.
//!
//! The [`List`] allows inserting, removing elements at any cursor position in
//! constant time. In compromise, reaching a position takes *O*(*n*) time.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use ghost_list::List;
//!
//! let mut list = List::from([1, 2, 3, 4]);
//!
//! let zero = list.insert(list.begin(), 0).unwrap(); // insert 0 at the beginning
//! assert_eq!(list, List::from([0, 1, 2, 3, 4]));
//!
//! let mut cursor = zero.as_cursor();
//! for _ in 0..3 {
//!     cursor.move_next(&list).unwrap();
//! }
//! let four = list.erase(cursor).unwrap(); // erase 3
//! assert_eq!(list.get(four), Ok(&4));
//! assert_eq!(list, List::from([0, 1, 2, 4]));
//!
//! list.push_front(5).unwrap();
//! assert_eq!(list.get(zero), Ok(&0)); // `zero` still names the same element
//! assert_eq!(list, List::from([5, 0, 1, 2, 4]));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║   value   ║ ─┐        ║   value   ║ ─┐                     ┊ dangling  ┊
//! │  ╟───────────╢  │        ╟───────────╢  │                     ├───────────┤
//! │  ║   slot    ║  │        ║   slot    ║  │                     ┊ reserved  ┊
//! │  ╚═══════════╝  ↓        ╚═══════════╝  ↓                     └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0   ╔═══╗         Node 1    ╔═══╗                       ↑   ↑
//! │               ║ T ║                   ║ T ║                       │   │
//! │               ╚═══╝                   ╚═══╝                       │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║    len    ║
//! ╟───────────╢
//! ║   slots   ║  slot index → (node, generation)
//! ╟───────────╢
//! ║   alloc   ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a pointer `ghost` that points to the ghost node;
//! - a length field `len` indicating the length of the list;
//! - a table of slots, through which cursors find their nodes;
//! - the allocation strategy, see [`alloc`].
//!
//! Each node of the list is provided by the allocation strategy, and contains:
//! - the `next` pointer that points to the next element (or the ghost node if it
//!   is the last element in the list);
//! - the `prev` pointer that points to the previous element (or the ghost node if
//!   it is the first element in the list);
//! - the `value` pointer to the element, which lives in its own allocation, also
//!   provided by the strategy;
//! - the index of its slot.
//!
//! Note that the ghost node has *NO* value and *NO* slot.
//!
//! Initially, there is a ghost node in an empty list, of which the `next` and `prev`
//! pointer point to itself.
//!
//! As elements are inserted into the list, `ghost.next` points to the first element,
//! and `ghost.prev` points to the last element of the list.
//!
//! # Iteration
//!
//! Iterating over a list is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended iterators and iterate the list like an array (fused and non-cyclic).
//! [`IterMut`] provides mutability of the elements (but not the linked structure of
//! the list).
//!
//! ## Examples
//!
//! ```
//! use ghost_list::List;
//!
//! let mut list = List::from([1, 2, 3]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), Some(&3));
//! assert_eq!(iter.next(), None);
//! assert_eq!(iter.next(), None); // Fused and non-cyclic
//!
//! list.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(list), vec![2, 4, 6]);
//! ```
//!
//! # Cursors
//!
//! [`Cursor`] and [`CursorMut`] name a position in a list: an element, or the
//! end position after the last one. They are small `Copy` handles that do not
//! borrow the list, so they can be stored and used again after the list has
//! been mutated.
//!
//! - inserting never invalidates a cursor;
//! - erasing an element only invalidates the cursors naming it, and using them
//!   afterwards reports [`Error::StaleCursor`];
//! - [`List::sort`], [`List::reverse`] and [`List::swap`] relink nodes without
//!   moving values, so every cursor keeps naming the same element.
//!
//! ## Examples
//!
//! ```
//! use ghost_list::{Error, List};
//!
//! let mut list = List::from([3, 1, 2]);
//! let two = list.last();
//!
//! list.sort();
//! assert_eq!(list.get(two), Ok(&2));
//!
//! list.erase(two).unwrap();
//! assert_eq!(list.get(two), Err(Error::StaleCursor));
//! ```
//!
//! # Algorithms
//!
//! - [`List::remove`], [`List::remove_if`], [`List::unique`] and [`List::unique_by`]
//!   erase elements in one stable pass and return how many were erased;
//! - [`List::sort`], [`List::sort_by`] and [`List::sort_by_key`] are a stable
//!   merge sort by relinking;
//! - [`List::assign`], [`List::assign_iter`] and [`Clone::clone_from`] overwrite
//!   existing elements in place before growing or shrinking the list.
//!
//! # Errors
//!
//! Operations that may allocate return [`Error::Alloc`] when the strategy fails.
//! A single insertion then leaves the list untouched; a batch insertion keeps the
//! elements inserted before the failure. Cursors used where they have no meaning
//! are reported with the other [`Error`] variants, and never modify the list.
//!
//! [`List`]: crate::List
//! [`Iter`]: crate::Iter
//! [`IterMut`]: crate::IterMut
//! [`Cursor`]: crate::Cursor
//! [`CursorMut`]: crate::CursorMut

#[doc(inline)]
pub use alloc::{Allocator, Global};
#[doc(inline)]
pub use error::{AllocError, Error};
#[doc(inline)]
pub use list::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use list::List;

pub mod alloc;
pub mod list;

mod error;
