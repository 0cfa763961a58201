use std::alloc::Layout;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::alloc::{Allocator, Global};
use crate::error::Error;
use crate::list::cursor::{Cursor, CursorMut};
use crate::list::slots::{Handle, Slots};
use crate::{IntoIter, Iter, IterMut};

pub mod cursor;
pub mod iterator;

mod algorithms;
mod slots;

/// The `List` is a doubly-linked list with owned nodes, implemented as a cyclic list
/// around a ghost node. It allows inserting, removing elements at any cursor position
/// in constant time. In compromise, reaching a position takes *O*(*n*) time.
///
/// The `List` contains:
/// - a pointer `ghost` to the ghost node, which marks both ends of the list;
/// - a length field `len`;
/// - a table of slots that lets cursors find their node (see [`Cursor`]);
/// - the allocation strategy `A`, which provides the storage of every node and
///   every value (see [`Allocator`]).
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `first..last`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node).
pub struct List<T, A: Allocator = Global> {
    ghost: NonNull<Node<T>>,
    /// the length of the list
    pub(crate) len: usize,
    slots: Slots<T>,
    alloc: A,
    _marker: PhantomData<T>,
}

/// A list node. The value lives in its own allocation, `value` only points to it.
///
/// The ghost node has a dangling `value` and is never dereferenced through it.
pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    pub(crate) value: NonNull<T>,
    pub(crate) slot: u32,
}

impl<T> Node<T> {
    /// # Safety
    ///
    /// `node` must be a non-ghost node of a live list.
    pub(crate) unsafe fn element<'a>(node: NonNull<Self>) -> &'a T {
        &*node.as_ref().value.as_ptr()
    }

    /// # Safety
    ///
    /// `node` must be a non-ghost node of a live list, and no other reference
    /// to its element may exist.
    pub(crate) unsafe fn element_mut<'a>(node: NonNull<Self>) -> &'a mut T {
        &mut *node.as_ref().value.as_ptr()
    }
}

pub(crate) unsafe fn connect<T>(mut prev: NonNull<Node<T>>, mut next: NonNull<Node<T>>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

// private methods
impl<T, A: Allocator> List<T, A> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Resolve a cursor handle to a node of this list.
    pub(crate) fn node_of(&self, handle: Handle) -> Result<NonNull<Node<T>>, Error> {
        if handle.is_ghost() {
            return Ok(self.ghost);
        }
        self.slots.get(handle).ok_or(Error::StaleCursor)
    }

    pub(crate) fn handle_of(&self, node: NonNull<Node<T>>) -> Handle {
        if node == self.ghost {
            return Handle::GHOST;
        }
        // SAFETY: `node` is a live node of the list.
        self.slots.handle(unsafe { node.as_ref().slot })
    }

    pub(crate) fn cursor_at(&self, node: NonNull<Node<T>>) -> CursorMut<T> {
        CursorMut::new(self.handle_of(node))
    }

    /// Allocate a detached node holding `value`.
    ///
    /// Storage is acquired in the order: slot table, value, node. On failure,
    /// everything acquired so far is released and the list is left untouched.
    fn new_node(&mut self, value: T) -> Result<NonNull<Node<T>>, Error> {
        self.slots.reserve_one()?;
        let value_layout = Layout::new::<T>();
        let value_ptr = self.alloc.allocate_value(value_layout)?.cast::<T>();
        let node = match self.alloc.allocate_node(Layout::new::<Node<T>>()) {
            Ok(ptr) => ptr.cast::<Node<T>>(),
            Err(err) => {
                // SAFETY: the slot was allocated above with the same layout, and
                // holds no value yet.
                unsafe { self.alloc.deallocate_value(value_ptr.cast(), value_layout) };
                return Err(err.into());
            }
        };
        // SAFETY: both blocks are fresh and fit their layouts.
        unsafe {
            self.alloc.construct(value_ptr, value);
            let slot = self.slots.insert(node);
            node.as_ptr().write(Node {
                next: node,
                prev: node,
                value: value_ptr,
                slot,
            });
        }
        Ok(node)
    }

    /// Allocate a node holding `value` and link it right before `next`.
    fn insert_before(
        &mut self,
        next: NonNull<Node<T>>,
        value: T,
    ) -> Result<NonNull<Node<T>>, Error> {
        let node = self.new_node(value)?;
        // SAFETY: `next` is a node of the list, so are `next.prev` and `next`,
        // and they are adjacent.
        unsafe { self.attach_node(next.as_ref().prev, next, node) };
        Ok(node)
    }

    /// Detach a single node `node` from the list.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the list,
    /// or whether it is the ghost node.
    ///
    /// If the `node` does not belong to the list, this function call will make
    /// the list ill-formed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node<T>>) {
        self.len -= 1;
        connect(node.as_ref().prev, node.as_ref().next);
    }

    /// Attach a single node `node` to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the list, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    ///
    /// If the `prev` and `next` does not belong to the list, or they are not
    /// adjacent nodes, this function call will make the list ill-formed.
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        node: NonNull<Node<T>>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        self.len += 1;
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, next);
        }
    }

    /// Detach `node`, release its slot and its node structure, and return the
    /// (still initialized) value it owned.
    unsafe fn unlink_node(&mut self, node: NonNull<Node<T>>) -> NonNull<T> {
        self.detach_node(node);
        let Node { value, slot, .. } = node.as_ptr().read();
        self.slots.release(slot);
        self.alloc
            .deallocate_node(node.cast(), Layout::new::<Node<T>>());
        value
    }

    /// Remove a non-ghost node and move its value out.
    pub(crate) unsafe fn take_node(&mut self, node: NonNull<Node<T>>) -> T {
        let value = self.unlink_node(node);
        let element = value.as_ptr().read();
        self.alloc
            .deallocate_value(value.cast(), Layout::new::<T>());
        element
    }

    /// Remove a non-ghost node and destroy its value.
    ///
    /// The list is consistent again before the value is destroyed, so a panicking
    /// destructor only leaks the value slot.
    pub(crate) unsafe fn erase_node(&mut self, node: NonNull<Node<T>>) {
        let value = self.unlink_node(node);
        self.alloc.destroy(value);
        self.alloc
            .deallocate_value(value.cast(), Layout::new::<T>());
    }

    /// Erase the nodes `first..last`.
    ///
    /// It is unsafe because it does not check whether `first..last` is a valid range.
    pub(crate) unsafe fn erase_nodes(&mut self, mut first: NonNull<Node<T>>, last: NonNull<Node<T>>) {
        while first != last {
            let next = first.as_ref().next;
            self.erase_node(first);
            first = next;
        }
    }

    /// The node `at` steps after the front node, `at <= len`.
    pub(crate) fn nth_node(&self, at: usize) -> NonNull<Node<T>> {
        debug_assert!(at <= self.len);
        // SAFETY: the walk stays within the list, ending at the ghost node
        // at the latest.
        unsafe {
            if at <= self.len / 2 {
                let mut node = self.front_node();
                for _ in 0..at {
                    node = node.as_ref().next;
                }
                node
            } else {
                let mut node = self.ghost;
                for _ in at..self.len {
                    node = node.as_ref().prev;
                }
                node
            }
        }
    }

    /// Check every structural invariant of the list, panicking on violation.
    #[cfg(any(test, feature = "invariants"))]
    pub(crate) fn check_invariants(&self) {
        let mut count = 0;
        let mut node = self.ghost;
        // SAFETY: only nodes reachable from the ghost node are visited.
        unsafe {
            loop {
                let next = node.as_ref().next;
                assert_eq!(next.as_ref().prev, node, "broken `prev` link");
                node = next;
                if node == self.ghost {
                    break;
                }
                assert_eq!(
                    self.slots.get(self.handle_of(node)),
                    Some(node),
                    "node is not registered in its slot"
                );
                count += 1;
                assert!(count <= self.len, "more nodes than `len`");
            }
        }
        assert_eq!(count, self.len, "`len` differs from the node count");
        assert_eq!(self.slots.live(), self.len, "leaked or missing slots");
    }

    #[cfg(not(any(test, feature = "invariants")))]
    #[inline(always)]
    pub(crate) fn check_invariants(&self) {}
}

impl<T> List<T> {
    /// Create an empty `List`.
    ///
    /// # Examples
    /// ```
    /// use ghost_list::List;
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create a list of `count` clones of `value`.
    ///
    /// # Examples
    /// ```
    /// use ghost_list::List;
    /// let list = List::repeat(3, &"a").unwrap();
    /// assert_eq!(list, List::from(["a", "a", "a"]));
    /// ```
    pub fn repeat(count: usize, value: &T) -> Result<Self, Error>
    where
        T: Clone,
    {
        Self::repeat_in(count, value, Global)
    }

    /// Create a list of `count` default values.
    ///
    /// # Examples
    /// ```
    /// use ghost_list::List;
    /// let list: List<i32> = List::with_len(2).unwrap();
    /// assert_eq!(list, List::from([0, 0]));
    /// ```
    pub fn with_len(count: usize) -> Result<Self, Error>
    where
        T: Default,
    {
        let mut list = Self::new();
        list.resize_default(count)?;
        Ok(list)
    }

    /// Create a list from the values of an iterator, reporting allocation failure
    /// instead of panicking like [`FromIterator`] does.
    pub fn try_from_iter<I>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
    {
        Self::try_from_iter_in(iter, Global)
    }
}

impl<T, A: Allocator> List<T, A> {
    /// Create an empty `List` whose nodes and values are provided by `alloc`.
    pub fn new_in(alloc: A) -> Self {
        let ghost = new_ghost();
        let len = 0;
        let slots = Slots::new();
        let _marker = PhantomData;
        Self {
            ghost,
            len,
            slots,
            alloc,
            _marker,
        }
    }

    /// Like [`List::repeat`], with the given allocation strategy.
    pub fn repeat_in(count: usize, value: &T, alloc: A) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut list = Self::new_in(alloc);
        list.insert_n(list.end(), count, value)?;
        Ok(list)
    }

    /// Like [`List::try_from_iter`], with the given allocation strategy.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new_in(alloc);
        list.insert_iter(list.end(), iter)?;
        Ok(list)
    }

    /// Returns the allocation strategy of the list.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.is_empty());
    ///
    /// list.push_front("foo").unwrap();
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the length of the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2).unwrap();
    /// assert_eq!(list.len(), 1);
    ///
    /// list.push_front(1).unwrap();
    /// assert_eq!(list.len(), 2);
    ///
    /// list.push_back(3).unwrap();
    /// assert_eq!(list.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes all elements from the `List`. The list stays usable.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// assert_eq!(list.front(), Some(&1));
    ///
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// assert_eq!(list.front(), None);
    /// ```
    pub fn clear(&mut self) {
        // SAFETY: `front..ghost` is the whole list.
        unsafe { self.erase_nodes(self.front_node(), self.ghost) };
        self.check_invariants();
    }

    /// Shortens the list to its first `len` elements. Does nothing if the list
    /// is not longer than `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2, 3, 4]);
    /// list.truncate(2);
    /// assert_eq!(list, List::from([1, 2]));
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let first = self.nth_node(len);
        // SAFETY: `first` is a node of the list, so `first..ghost` is a valid range.
        unsafe { self.erase_nodes(first, self.ghost) };
        self.check_invariants();
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.front(), None);
    ///
    /// list.push_front(1).unwrap();
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is not the ghost.
        Some(unsafe { Node::element(self.front_node()) })
    }

    /// Provides a mutable reference to the front element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1]);
    /// if let Some(x) = list.front_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.front(), Some(&5));
    /// ```
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: as in `front`, and `self` is borrowed mutably.
        Some(unsafe { Node::element_mut(self.front_node()) })
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.back(), None);
    ///
    /// list.push_back(1).unwrap();
    /// assert_eq!(list.back(), Some(&1));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is not the ghost.
        Some(unsafe { Node::element(self.back_node()) })
    }

    /// Provides a mutable reference to the back element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1]);
    /// if let Some(x) = list.back_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.back(), Some(&5));
    /// ```
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: as in `back`, and `self` is borrowed mutably.
        Some(unsafe { Node::element_mut(self.back_node()) })
    }

    /// Returns the element the cursor names.
    ///
    /// # Errors
    ///
    /// [`Error::AtEnd`] for the end position, [`Error::StaleCursor`] if the
    /// element has been erased.
    pub fn get(&self, at: impl Into<Cursor<T>>) -> Result<&T, Error> {
        let node = self.node_of(at.into().handle)?;
        if node == self.ghost {
            return Err(Error::AtEnd);
        }
        // SAFETY: `node` is a live, non-ghost node of the list.
        Ok(unsafe { Node::element(node) })
    }

    /// Returns the element the cursor names, mutably. See [`List::get`].
    pub fn get_mut(&mut self, at: CursorMut<T>) -> Result<&mut T, Error> {
        let node = self.node_of(at.handle)?;
        if node == self.ghost {
            return Err(Error::AtEnd);
        }
        // SAFETY: `node` is a live, non-ghost node, and `self` is borrowed mutably.
        Ok(unsafe { Node::element_mut(node) })
    }

    /// Inserts `value` right before `pos`, and returns a cursor to it.
    ///
    /// No cursor is invalidated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Errors
    ///
    /// [`Error::StaleCursor`] if `pos` names an erased element, [`Error::Alloc`]
    /// if storage cannot be acquired. In both cases the list is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 3]);
    /// let mut pos = list.begin();
    /// pos.move_next(&list).unwrap();
    ///
    /// let two = list.insert(pos, 2).unwrap();
    /// assert_eq!(list.get(two), Ok(&2));
    /// assert_eq!(list.get(pos), Ok(&3));
    /// assert_eq!(list, List::from([1, 2, 3]));
    /// ```
    pub fn insert(&mut self, pos: impl Into<Cursor<T>>, value: T) -> Result<CursorMut<T>, Error> {
        let next = self.node_of(pos.into().handle)?;
        let node = self.insert_before(next, value)?;
        self.check_invariants();
        Ok(self.cursor_at(node))
    }

    /// Inserts `count` clones of `value` right before `pos`, and returns a cursor
    /// to the first of them, or `pos` if `count` is zero.
    ///
    /// # Errors
    ///
    /// As [`List::insert`]. Elements inserted before an allocation failure
    /// stay in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 4]);
    /// let end = list.end();
    /// let first = list.insert_n(list.begin(), 2, &0).unwrap();
    /// assert_eq!(list.get(first), Ok(&0));
    /// assert_eq!(list.insert_n(end, 0, &9).unwrap(), end);
    /// assert_eq!(list, List::from([0, 0, 1, 4]));
    /// ```
    pub fn insert_n(
        &mut self,
        pos: impl Into<Cursor<T>>,
        count: usize,
        value: &T,
    ) -> Result<CursorMut<T>, Error>
    where
        T: Clone,
    {
        let next = self.node_of(pos.into().handle)?;
        let mut first = None;
        for _ in 0..count {
            let node = self.insert_before(next, value.clone())?;
            first.get_or_insert(node);
        }
        self.check_invariants();
        Ok(self.cursor_at(first.unwrap_or(next)))
    }

    /// Inserts the values of `iter` in order right before `pos`, and returns a
    /// cursor to the first of them, or `pos` if `iter` is empty.
    ///
    /// # Errors
    ///
    /// As [`List::insert`]. Elements inserted before an allocation failure
    /// stay in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([10, 20]);
    /// let mut pos = list.begin();
    /// pos.move_next(&list).unwrap();
    ///
    /// list.insert_iter(pos, [1, 2, 3]).unwrap();
    /// list.insert_iter(list.end(), vec![111, 222]).unwrap();
    /// assert_eq!(list, List::from([10, 1, 2, 3, 20, 111, 222]));
    /// ```
    pub fn insert_iter<I>(&mut self, pos: impl Into<Cursor<T>>, iter: I) -> Result<CursorMut<T>, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let next = self.node_of(pos.into().handle)?;
        let mut first = None;
        for value in iter {
            let node = self.insert_before(next, value)?;
            first.get_or_insert(node);
        }
        self.check_invariants();
        Ok(self.cursor_at(first.unwrap_or(next)))
    }

    /// Adds an element first in the list, and returns a cursor to it.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2).unwrap();
    /// assert_eq!(list.front().unwrap(), &2);
    ///
    /// list.push_front(1).unwrap();
    /// assert_eq!(list.front().unwrap(), &1);
    /// ```
    pub fn push_front(&mut self, elt: T) -> Result<CursorMut<T>, Error> {
        let node = self.insert_before(self.front_node(), elt)?;
        self.check_invariants();
        Ok(self.cursor_at(node))
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1).unwrap();
    /// list.push_front(3).unwrap();
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is not the ghost.
        let elt = unsafe { self.take_node(self.front_node()) };
        self.check_invariants();
        Some(elt)
    }

    /// Appends an element to the back of a list, and returns a cursor to it.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_back(1).unwrap();
    /// list.push_back(3).unwrap();
    /// assert_eq!(list.back().unwrap(), &3);
    /// ```
    pub fn push_back(&mut self, elt: T) -> Result<CursorMut<T>, Error> {
        let node = self.insert_before(self.ghost, elt)?;
        self.check_invariants();
        Ok(self.cursor_at(node))
    }

    /// Removes the last element from a list and returns it, or `None` if
    /// it is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_back(), None);
    /// list.push_back(1).unwrap();
    /// list.push_back(3).unwrap();
    /// assert_eq!(list.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is not the ghost.
        let elt = unsafe { self.take_node(self.back_node()) };
        self.check_invariants();
        Some(elt)
    }

    /// Erases the element at `pos`, and returns a cursor to the element that
    /// followed it.
    ///
    /// Only cursors naming the erased element are invalidated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Errors
    ///
    /// [`Error::AtEnd`] if `pos` is the end position, [`Error::StaleCursor`]
    /// if it names an erased element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::{Error, List};
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let first = list.begin();
    /// let next = list.erase(first).unwrap();
    /// assert_eq!(list.get(next), Ok(&2));
    /// assert_eq!(list.get(first), Err(Error::StaleCursor));
    /// assert_eq!(list.erase(list.end()), Err(Error::AtEnd));
    /// ```
    pub fn erase(&mut self, pos: impl Into<Cursor<T>>) -> Result<CursorMut<T>, Error> {
        let node = self.node_of(pos.into().handle)?;
        if node == self.ghost {
            return Err(Error::AtEnd);
        }
        // SAFETY: `node` is a live, non-ghost node of the list.
        let next = unsafe {
            let next = node.as_ref().next;
            self.erase_node(node);
            next
        };
        self.check_invariants();
        Ok(self.cursor_at(next))
    }

    /// Erases the elements in `first..last`, and returns `last`.
    ///
    /// The range is checked before anything is erased.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k*) time, where *k* is the length of
    /// the range.
    ///
    /// # Errors
    ///
    /// [`Error::StaleCursor`] if either cursor names an erased element,
    /// [`Error::InvalidRange`] if `last` cannot be reached from `first` without
    /// passing the end. In both cases the list is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::{Error, List};
    ///
    /// let mut list = List::from([1, 2, 3, 4]);
    /// let mut first = list.begin();
    /// first.move_next(&list).unwrap();
    /// let mut last = first;
    /// last.move_next(&list).unwrap();
    /// last.move_next(&list).unwrap();
    ///
    /// assert_eq!(list.erase_range(last, first), Err(Error::InvalidRange));
    /// assert_eq!(list.erase_range(first, last).unwrap(), last);
    /// assert_eq!(list, List::from([1, 4]));
    /// ```
    pub fn erase_range(
        &mut self,
        first: impl Into<Cursor<T>>,
        last: impl Into<Cursor<T>>,
    ) -> Result<CursorMut<T>, Error> {
        let first = self.node_of(first.into().handle)?;
        let last = self.node_of(last.into().handle)?;
        self.range_len(first, last)?;
        // SAFETY: `first..last` has just been checked.
        unsafe { self.erase_nodes(first, last) };
        self.check_invariants();
        Ok(self.cursor_at(last))
    }

    /// Count the nodes in `first..last`, or fail if `last` is not reachable from
    /// `first` without passing the ghost node.
    pub(crate) fn range_len(
        &self,
        first: NonNull<Node<T>>,
        last: NonNull<Node<T>>,
    ) -> Result<usize, Error> {
        let mut node = first;
        let mut len = 0;
        while node != last {
            if node == self.ghost {
                return Err(Error::InvalidRange);
            }
            // SAFETY: `node` is a live node of the list.
            node = unsafe { node.as_ref().next };
            len += 1;
        }
        Ok(len)
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([0, 1, 2]);
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([0, 1, 2]);
    ///
    /// for element in list.iter_mut() {
    ///     *element += 10;
    /// }
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&10));
    /// assert_eq!(iter.next(), Some(&11));
    /// assert_eq!(iter.next(), Some(&12));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Provides an iterator over the half-open range `first..last`.
    ///
    /// # Errors
    ///
    /// As [`List::erase_range`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([1, 2, 3, 4]);
    /// let mut first = list.begin();
    /// first.move_next(&list).unwrap();
    ///
    /// let tail: Vec<_> = list.range(first, list.end()).unwrap().rev().collect();
    /// assert_eq!(tail, vec![&4, &3, &2]);
    /// ```
    pub fn range(
        &self,
        first: impl Into<Cursor<T>>,
        last: impl Into<Cursor<T>>,
    ) -> Result<Iter<'_, T>, Error> {
        let first = self.node_of(first.into().handle)?;
        let last = self.node_of(last.into().handle)?;
        let len = self.range_len(first, last)?;
        Ok(Iter::from_range(first, last, len))
    }
}

impl<T: Debug, A: Allocator> Debug for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

fn new_ghost<T>() -> NonNull<Node<T>> {
    let dangling = NonNull::dangling();
    let ghost = NonNull::from(Box::leak(Box::new(Node {
        next: dangling,
        prev: dangling,
        value: NonNull::dangling(),
        slot: Handle::GHOST.index,
    })));
    // SAFETY: `ghost` was just leaked from a box, and nothing else refers to it.
    unsafe { connect(ghost, ghost) };
    ghost
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl<T, A: Allocator> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was leaked from a box in `new_ghost`.
        drop(unsafe { Box::from_raw(self.ghost.as_ptr()) });
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for List<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for List<T, A> {}

// Ensure that `List` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}
