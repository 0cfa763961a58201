use crate::alloc::{Allocator, Global};
use crate::list::{List, Node};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An iterator over the elements of a `List`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the list, where `start` is inclusive and `end` is not.
///
/// Though the `Iter` does not hold a reference from the list,
/// it actually *borrows* (immutably) from the list, so a phantom
/// marker of `&'a T` is added to protect the list from being
/// written.
///
/// # Examples
///
/// ```compile_fail
/// use ghost_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let mut iter = list.iter();
///
/// // Won't compile, because list is already borrowed immutably.
/// list.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new<A: Allocator>(list: &'a List<T, A>) -> Self {
        Self::from_range(list.front_node(), list.ghost_node(), list.len())
    }

    /// `start..end` must be a valid range of `len` nodes of a list borrowed for `'a`.
    pub(crate) fn from_range(start: NonNull<Node<T>>, end: NonNull<Node<T>>, len: usize) -> Self {
        let _marker = PhantomData;
        Self {
            start,
            end,
            len,
            _marker,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a list,
        // and it is not empty here, so `start` is not the ghost node.
        let current = self.start;
        self.start = unsafe { current.as_ref().next };
        self.len -= 1;
        Some(unsafe { Node::element(current) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a list,
        // and it is not empty here, so `end.prev` is not the ghost node.
        self.end = unsafe { self.end.as_ref().prev };
        self.len -= 1;
        Some(unsafe { Node::element(self.end) })
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a `List`.
///
/// `start..end` denotes a subrange of the list.
///
/// Though the `IterMut` does not hold a reference from the list,
/// it actually *borrows* (mutably) from the list, so a phantom
/// marker of `&'a mut T` is added to protect the list from
/// being read.
///
/// # Examples
///
/// `List` is not readable after an `IterMut` is created.
/// ```compile_fail
/// use ghost_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let mut iter = list.iter_mut();
/// println!("{:?}", list.back());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new<A: Allocator>(list: &'a mut List<T, A>) -> Self {
        let start = list.front_node();
        let end = list.ghost_node();
        let len = list.len();
        let _marker = PhantomData;
        Self {
            start,
            end,
            len,
            _marker,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a list, it is not
        // empty here, and every node in it is yielded at most once.
        let current = self.start;
        self.start = unsafe { current.as_ref().next };
        self.len -= 1;
        Some(unsafe { Node::element_mut(current) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: as in `next`.
        self.end = unsafe { self.end.as_ref().prev };
        self.len -= 1;
        Some(unsafe { Node::element_mut(self.end) })
    }
}

/// An owning iterator over the elements of a `List`.
///
/// This `struct` is created by the [`into_iter`] method on [`List`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: List::into_iter
pub struct IntoIter<T, A: Allocator = Global> {
    list: List<T, A>,
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("list", &self.list)
            .finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.list.len;
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// # Panics
///
/// Panics if a node or a value cannot be allocated. Use [`List::try_from_iter`]
/// to handle the failure instead.
impl<T, A: Allocator + Default> FromIterator<T> for List<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::default();
        list.extend(iter);
        list
    }
}

/// # Panics
///
/// Panics if a node or a value cannot be allocated. Use [`List::insert_iter`]
/// to handle the failure instead.
impl<T, A: Allocator> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.insert_iter(self.end(), iter) {
            panic!("{}", err);
        }
    }
}

impl<'a, T: 'a + Copy, A: Allocator> Extend<&'a T> for List<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T, const N: usize> From<[T; N]> for List<T> {
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([1, 2, 3]);
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list.back(), Some(&3));
    /// ```
    fn from(array: [T; N]) -> Self {
        Self::from_iter(array)
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::List;
    use std::fmt::Debug;
    use std::iter::FromIterator;

    #[test]
    fn test_iter() {
        macro_rules! test_iter {
            ($FN:ident, $ITER:ident $(, $REV:ident)?) => {
                fn $FN<T, I>(input: I, mid: usize)
                where
                    T: Eq + Debug + Clone,
                    I: IntoIterator<Item = T>,
                {
                    #[allow(unused_mut)]
                    let mut vec = Vec::from_iter(input);
                    #[allow(unused_mut)]
                    let mut list: List<T> = List::from_iter(vec.clone());
                    let len = vec.len();
                    let mut iter = list.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )?.enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);

                    let mut iter = list.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )? .take(mid).enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    let mut iter = iter.rev();
                    for (i, item) in vec.$ITER() $( .$REV() )? .skip(mid).rev().enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - mid - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);
                }
            };
        }
        test_iter!(test_iter, iter);
        test_iter!(test_iter_mut, iter_mut);
        test_iter!(test_back_iter, iter, rev);
        test_iter!(test_back_iter_mut, iter_mut, rev);

        fn test_case<T, I>(input: I, mid: usize)
        where
            T: Eq + Debug + Clone,
            I: IntoIterator<Item = T> + Clone,
        {
            test_iter(input.clone(), mid);
            test_iter_mut(input.clone(), mid);
            test_back_iter(input.clone(), mid);
            test_back_iter_mut(input.clone(), mid);
        }
        test_case(0..10, 10);
        test_case(0..10, 8);
        test_case(0..10, 5);
        test_case(0..10, 2);
        test_case(0..10, 0);
        test_case(0..2, 2);
        test_case(0..2, 1);
        test_case(0..2, 0);
        test_case(0..1, 1);
        test_case(0..1, 0);
        test_case(0..0, 0);
    }

    #[test]
    fn test_into_iter() {
        let list = List::from([1, 2, 3, 4]);
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_range() {
        let list = List::from([0, 1, 2, 3, 4]);
        let mut first = list.begin();
        first.move_next(&list).unwrap();
        let mut last = first;
        last.move_next(&list).unwrap();
        last.move_next(&list).unwrap();

        let mut range = list.range(first, last).unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range.next(), Some(&1));
        assert_eq!(range.next_back(), Some(&2));
        assert_eq!(range.next(), None);

        assert_eq!(list.range(first, first).unwrap().count(), 0);
        assert!(list.range(last, first).is_err());
    }

    #[test]
    fn test_extend() {
        let mut list = List::from([1]);
        list.extend(vec![2, 3]);
        list.extend(&[4, 5]);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "memory allocation failed")]
    fn test_extend_panics_on_alloc_failure() {
        let alloc = crate::alloc::Instrumented::new();
        let mut list = List::new_in(alloc.clone());
        alloc.fail_after(0);
        list.extend([1]);
    }
}
