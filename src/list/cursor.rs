use crate::alloc::Allocator;
use crate::error::Error;
use crate::list::slots::Handle;
use crate::list::{List, Node};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A read-only cursor over a `List`.
///
/// A `Cursor` names one position of a list: one of its elements, or the end
/// position right after the last element. It does not borrow the list, so it
/// can be kept across mutations; every operation takes the list it belongs to.
///
/// In a list with length *n*, there are *n* + 1 valid positions for the cursor.
/// The end position is the same for every list.
///
/// Inserting elements, sorting, reversing or swapping lists never changes which
/// element a cursor names. Once its element is erased, the cursor is *stale*:
/// every operation on it reports [`Error::StaleCursor`], even after the
/// storage of the element has been reused.
///
/// A cursor must only be used with the list it was obtained from (or the
/// list its element has been swapped into). Using it with another list is
/// memory safe, but the result is unspecified.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The end position
/// of the list is denoted by `#`).
/// ```
/// use ghost_list::{Error, List};
///
/// // Create a list: [ A B C D #]
/// let list = List::from(['A', 'B', 'C', 'D']);
///
/// // Create a cursor at start: [|A B C D #]
/// let mut cursor = list.begin();
/// assert_eq!(cursor.get(&list), Ok(&'A'));
///
/// // Move cursor forward: [ A|B C D #]
/// assert!(cursor.move_next(&list).is_ok());
/// assert_eq!(cursor.get(&list), Ok(&'B'));
///
/// // Create a cursor in the end: [ A B C D|#]
/// let mut cursor = list.end();
/// assert_eq!(cursor.get(&list), Err(Error::AtEnd));
/// assert_eq!(cursor.move_next(&list), Err(Error::PastEnd));
///
/// // Move cursor backward: [ A B C|D #]
/// assert!(cursor.move_prev(&list).is_ok());
/// assert_eq!(cursor.get(&list), Ok(&'D'));
/// ```
pub struct Cursor<T> {
    pub(crate) handle: Handle,
    _marker: PhantomData<fn() -> T>,
}

/// A cursor over a `List` that can also give mutable access to its element.
///
/// It is obtained from operations taking the list mutably, such as
/// [`List::insert`] or [`List::begin_mut`], and converts into a [`Cursor`]
/// (but not the other way around). Apart from [`CursorMut::get_mut`], it
/// behaves like a `Cursor`.
///
/// # Examples
///
/// ```
/// use ghost_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let cursor = list.push_back(4).unwrap();
/// *cursor.get_mut(&mut list).unwrap() *= 10;
///
/// let read_only = cursor.as_cursor();
/// assert_eq!(read_only, cursor);
/// assert_eq!(read_only.get(&list), Ok(&40));
/// ```
pub struct CursorMut<T> {
    pub(crate) handle: Handle,
    _marker: PhantomData<fn() -> T>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        impl<T> $CURSOR<T> {
            pub(crate) fn new(handle: Handle) -> Self {
                let _marker = PhantomData;
                Self { handle, _marker }
            }

            /// Returns `true` if the cursor is at the end position.
            pub fn is_end(&self) -> bool {
                self.handle.is_ghost()
            }

            /// Move the cursor to the next position.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Errors
            ///
            /// [`Error::PastEnd`] if the cursor is at the end position,
            /// [`Error::StaleCursor`] if its element has been erased. The
            /// cursor does not move in either case.
            pub fn move_next<A: Allocator>(&mut self, list: &List<T, A>) -> Result<(), Error> {
                let node = list.node_of(self.handle)?;
                if node == list.ghost_node() {
                    return Err(Error::PastEnd);
                }
                // SAFETY: `node` is a live node of the list.
                self.handle = list.handle_of(unsafe { node.as_ref().next });
                Ok(())
            }

            /// Move the cursor to the previous position.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Errors
            ///
            /// [`Error::BeforeStart`] if the cursor is at the first element
            /// (or at the end of an empty list), [`Error::StaleCursor`] if its
            /// element has been erased. The cursor does not move in either case.
            pub fn move_prev<A: Allocator>(&mut self, list: &List<T, A>) -> Result<(), Error> {
                let node = list.node_of(self.handle)?;
                // SAFETY: `node` is a live node of the list.
                let prev = unsafe { node.as_ref().prev };
                if prev == list.ghost_node() {
                    return Err(Error::BeforeStart);
                }
                self.handle = list.handle_of(prev);
                Ok(())
            }

            /// Returns the element at the cursor. See [`List::get`].
            pub fn get<'a, A: Allocator>(&self, list: &'a List<T, A>) -> Result<&'a T, Error> {
                let node = list.node_of(self.handle)?;
                if node == list.ghost_node() {
                    return Err(Error::AtEnd);
                }
                // SAFETY: `node` is a live, non-ghost node of the list.
                Ok(unsafe { Node::element(node) })
            }
        }

        impl<T> Clone for $CURSOR<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $CURSOR<T> {}

        /// Compare cursors by their position.
        impl<T> PartialEq for $CURSOR<T> {
            fn eq(&self, other: &Self) -> bool {
                self.handle == other.handle
            }
        }

        impl<T> Eq for $CURSOR<T> {}

        impl<T> Hash for $CURSOR<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.handle.hash(state)
            }
        }

        impl<T> fmt::Debug for $CURSOR<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_end() {
                    return f.write_str(concat!(stringify!($CURSOR), "(end)"));
                }
                f.debug_tuple(stringify!($CURSOR))
                    .field(&self.handle.index)
                    .field(&self.handle.generation)
                    .finish()
            }
        }
    };
}

impl_cursor!(Cursor);
impl_cursor!(CursorMut);

impl<T> CursorMut<T> {
    /// Returns the element at the cursor, mutably. See [`List::get_mut`].
    pub fn get_mut<'a, A: Allocator>(&self, list: &'a mut List<T, A>) -> Result<&'a mut T, Error> {
        list.get_mut(*self)
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<T> {
        Cursor::new(self.handle)
    }
}

impl<T> From<CursorMut<T>> for Cursor<T> {
    fn from(cursor: CursorMut<T>) -> Self {
        cursor.as_cursor()
    }
}

impl<T> PartialEq<Cursor<T>> for CursorMut<T> {
    fn eq(&self, other: &Cursor<T>) -> bool {
        self.handle == other.handle
    }
}

impl<T> PartialEq<CursorMut<T>> for Cursor<T> {
    fn eq(&self, other: &CursorMut<T>) -> bool {
        self.handle == other.handle
    }
}

impl<T, A: Allocator> List<T, A> {
    /// Returns a cursor at the first element, or at the end position if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([1, 2]);
    /// assert_eq!(list.begin().get(&list), Ok(&1));
    ///
    /// let empty = List::<i32>::new();
    /// assert_eq!(empty.begin(), empty.end());
    /// ```
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(self.handle_of(self.front_node()))
    }

    /// Returns a cursor at the end position, right after the last element.
    pub fn end(&self) -> Cursor<T> {
        Cursor::new(Handle::GHOST)
    }

    /// Returns a cursor at the last element, or at the end position if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([1, 2]);
    /// assert_eq!(list.last().get(&list), Ok(&2));
    /// ```
    pub fn last(&self) -> Cursor<T> {
        Cursor::new(self.handle_of(self.back_node()))
    }

    /// Like [`List::begin`], with mutable access to the element.
    pub fn begin_mut(&mut self) -> CursorMut<T> {
        CursorMut::new(self.handle_of(self.front_node()))
    }

    /// Like [`List::end`], for a list borrowed mutably.
    pub fn end_mut(&mut self) -> CursorMut<T> {
        CursorMut::new(Handle::GHOST)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::list::List;
    use std::collections::HashSet;

    #[test]
    fn test_cursor_move() {
        let list: List<i32> = (0..5).collect();
        let mut cursor = list.begin();
        for i in 0..5 {
            assert_eq!(cursor.get(&list), Ok(&i));
            cursor.move_next(&list).unwrap();
        }
        assert!(cursor.is_end());
        assert_eq!(cursor, list.end());
        assert_eq!(cursor.move_next(&list), Err(Error::PastEnd));
        assert!(cursor.is_end());

        for i in (0..5).rev() {
            cursor.move_prev(&list).unwrap();
            assert_eq!(cursor.get(&list), Ok(&i));
        }
        assert_eq!(cursor, list.begin());
        assert_eq!(cursor.move_prev(&list), Err(Error::BeforeStart));
        assert_eq!(cursor.get(&list), Ok(&0));
    }

    #[test]
    fn test_cursor_empty_list() {
        let list = List::<i32>::new();
        let mut cursor = list.begin();
        assert!(cursor.is_end());
        assert_eq!(list.last(), list.end());
        assert_eq!(cursor.get(&list), Err(Error::AtEnd));
        assert_eq!(cursor.move_next(&list), Err(Error::PastEnd));
        assert_eq!(cursor.move_prev(&list), Err(Error::BeforeStart));
    }

    #[test]
    fn test_cursor_survives_insertion() {
        let mut list = List::from([1, 3]);
        let one = list.begin();
        let three = list.last();
        list.insert(three, 2).unwrap();
        list.push_front(0).unwrap();
        list.push_back(4).unwrap();
        assert_eq!(list.get(one), Ok(&1));
        assert_eq!(list.get(three), Ok(&3));

        let mut cursor = one;
        cursor.move_next(&list).unwrap();
        assert_eq!(cursor.get(&list), Ok(&2));
        cursor.move_next(&list).unwrap();
        assert_eq!(cursor, three);
    }

    #[test]
    fn test_stale_cursor() {
        let mut list = List::from([1, 2, 3]);
        let mut two = list.begin();
        two.move_next(&list).unwrap();
        let copy = two;
        list.erase(two).unwrap();

        assert_eq!(copy.get(&list), Err(Error::StaleCursor));
        assert_eq!(two.move_next(&list), Err(Error::StaleCursor));
        assert_eq!(two.move_prev(&list), Err(Error::StaleCursor));
        assert!(!two.is_end());
    }

    #[test]
    fn test_cursor_mut() {
        let mut list = List::from([1, 2, 3]);
        let mut cursor = list.begin_mut();
        cursor.move_next(&list).unwrap();
        *cursor.get_mut(&mut list).unwrap() = 20;
        assert_eq!(list.get(cursor), Ok(&20));

        let end = list.end_mut();
        assert_eq!(end.get_mut(&mut list), Err(Error::AtEnd));
        assert_eq!(end, list.end());
        assert_eq!(list.end(), end);

        let read_only: super::Cursor<i32> = cursor.into();
        assert_eq!(read_only, cursor);
        assert_eq!(read_only.get(&list), Ok(&20));
    }

    #[test]
    fn test_cursor_hash() {
        let list = List::from(['a', 'b', 'c']);
        let mut cursors = HashSet::new();
        let mut cursor = list.begin();
        loop {
            assert!(cursors.insert(cursor));
            if cursor.move_next(&list).is_err() {
                break;
            }
        }
        assert_eq!(cursors.len(), 4);
        assert!(cursors.contains(&list.end()));
        assert!(cursors.contains(&list.last()));
    }

    #[test]
    fn test_cursor_debug() {
        let list = List::from([1]);
        assert_eq!(format!("{:?}", list.end()), "Cursor(end)");
        assert_eq!(format!("{:?}", list.begin()), "Cursor(0, 0)");
    }
}
