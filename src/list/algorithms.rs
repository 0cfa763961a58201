use crate::alloc::Allocator;
use crate::error::Error;
use crate::list::{connect, List, Node};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::iter;
use std::mem;
use std::ptr::NonNull;

mod sift;
mod sort;

impl<T, A, B> PartialEq<List<T, B>> for List<T, A>
where
    T: PartialEq,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &List<T, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq, A: Allocator> Eq for List<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for List<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, A: Allocator> Ord for List<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Hash, A: Allocator> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}

/// # Panics
///
/// Panics if a node or a value cannot be allocated. Use [`List::try_clone`]
/// to handle the failure instead.
impl<T: Clone, A: Allocator + Clone> Clone for List<T, A> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(list) => list,
            Err(err) => panic!("{}", err),
        }
    }

    /// Overwrites the elements of `self` with clones of the elements of `other`,
    /// reusing the nodes `self` already has.
    fn clone_from(&mut self, other: &Self) {
        if let Err(err) = self.assign_with(other, T::clone_from, T::clone) {
            panic!("{}", err);
        }
    }
}

impl<T, A: Allocator> List<T, A> {
    /// Returns an element-wise copy of the list, with its own storage from a
    /// clone of the allocation strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([1, 2]);
    /// let mut copy = list.try_clone().unwrap();
    /// copy.push_back(3).unwrap();
    /// assert_eq!(list, List::from([1, 2]));
    /// assert_eq!(copy, List::from([1, 2, 3]));
    /// ```
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
        A: Clone,
    {
        List::try_from_iter_in(self.iter().cloned(), self.alloc.clone())
    }

    /// Walks the list and `src` in lockstep, overwriting elements in place,
    /// then erases the elements left over or appends the items left over.
    fn assign_with<I, F, G>(&mut self, src: I, mut overwrite: F, make: G) -> Result<(), Error>
    where
        I: IntoIterator,
        F: FnMut(&mut T, I::Item),
        G: FnMut(I::Item) -> T,
    {
        let mut src = src.into_iter();
        let ghost = self.ghost_node();
        let mut node = self.front_node();
        while node != ghost {
            let Some(item) = src.next() else {
                // SAFETY: `node` is a node of the list, so `node..ghost` is a valid range.
                unsafe { self.erase_nodes(node, ghost) };
                self.check_invariants();
                return Ok(());
            };
            // SAFETY: `node` is a non-ghost node, and `self` is borrowed mutably.
            unsafe {
                overwrite(Node::element_mut(node), item);
                node = node.as_ref().next;
            }
        }
        self.insert_iter(self.end(), src.map(make))?;
        Ok(())
    }

    /// Replaces the contents with `count` clones of `value`.
    ///
    /// Existing elements are overwritten in place; only the missing ones are
    /// allocated, and the extra ones erased.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if growing fails. The elements appended before the
    /// failure stay in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2, 3, 4, 5]);
    /// list.assign(3, &0).unwrap();
    /// assert_eq!(list, List::from([0, 0, 0]));
    /// list.assign(4, &7).unwrap();
    /// assert_eq!(list, List::from([7, 7, 7, 7]));
    /// ```
    pub fn assign(&mut self, count: usize, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        self.assign_with(iter::repeat(value).take(count), T::clone_from, T::clone)
    }

    /// Replaces the contents with the values of `iter`, overwriting existing
    /// elements in place. See [`List::assign`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from(["a", "b"]);
    /// list.assign_iter(["x", "y", "z"]).unwrap();
    /// assert_eq!(list, List::from(["x", "y", "z"]));
    /// list.assign_iter(None).unwrap();
    /// assert!(list.is_empty());
    /// ```
    pub fn assign_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        self.assign_with(iter, |elt, value| *elt = value, |value| value)
    }

    /// Resizes the list to `len` elements, appending clones of `value` or
    /// erasing from the back. The kept elements are left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if growing fails. The elements appended before the
    /// failure stay in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// list.resize(4, &0).unwrap();
    /// assert_eq!(list, List::from([1, 2, 0, 0]));
    /// list.resize(1, &0).unwrap();
    /// assert_eq!(list, List::from([1]));
    /// ```
    pub fn resize(&mut self, len: usize, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        match len.checked_sub(self.len()) {
            Some(extra) => self.insert_n(self.end(), extra, value).map(drop),
            None => {
                self.truncate(len);
                Ok(())
            }
        }
    }

    /// Like [`List::resize`], appending default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([String::from("a")]);
    /// list.resize_default(2).unwrap();
    /// assert_eq!(list.back().map(String::as_str), Some(""));
    /// ```
    pub fn resize_default(&mut self, len: usize) -> Result<(), Error>
    where
        T: Default,
    {
        match len.checked_sub(self.len()) {
            Some(extra) => self
                .insert_iter(self.end(), iter::repeat_with(T::default).take(extra))
                .map(drop),
            None => {
                self.truncate(len);
                Ok(())
            }
        }
    }

    /// Exchanges the contents of two lists.
    ///
    /// No element is moved or copied, and cursors keep naming their elements,
    /// now in the other list.
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
    /// let mut a = List::from([1, 2]);
    /// let mut b = List::from([3, 4, 5]);
    /// let one = a.begin();
    ///
    /// a.swap(&mut b);
    /// assert_eq!(a, List::from([3, 4, 5]));
    /// assert_eq!(b, List::from([1, 2]));
    /// assert_eq!(b.get(one), Ok(&1));
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Reverses the order of the elements in place, by swapping the links of
    /// every node.
    ///
    /// Cursors keep naming their elements, which are now traversed in the
    /// opposite order.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let one = list.begin();
    /// list.reverse();
    /// assert_eq!(list, List::from([3, 2, 1]));
    /// assert_eq!(list.last(), one);
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        // SAFETY: the walk visits every node of the cycle, the ghost included,
        // exactly once.
        unsafe {
            loop {
                let node_mut = node.as_mut();
                mem::swap(&mut node_mut.next, &mut node_mut.prev);
                node = node_mut.next;
                if node == ghost {
                    break;
                }
            }
        }
        self.check_invariants();
    }

    /// Erases every element equal to `value`, keeping the order of the others.
    /// Returns the number of erased elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2, 3, 2, 4]);
    /// assert_eq!(list.remove(&2), 2);
    /// assert_eq!(list, List::from([1, 3, 4]));
    /// ```
    pub fn remove(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        sift::sift(self, |_, elt| elt != value)
    }

    /// Erases every element for which `pred` returns `true`, keeping the order of
    /// the others. Returns the number of erased elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 2, 3, 4, 5, 6]);
    /// assert_eq!(list.remove_if(|x| x % 3 == 0), 2);
    /// assert_eq!(list, List::from([1, 2, 4, 5]));
    /// ```
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        sift::sift(self, |_, elt| !pred(elt))
    }

    /// Collapses every run of consecutive equal elements to its first element.
    /// Returns the number of erased elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([1, 1, 2, 3, 3, 3, 1]);
    /// assert_eq!(list.unique(), 3);
    /// assert_eq!(list, List::from([1, 2, 3, 1]));
    /// ```
    pub fn unique(&mut self) -> usize
    where
        T: PartialEq,
    {
        self.unique_by(|kept, elt| kept == elt)
    }

    /// Erases every element that `same` judges equivalent to the last element
    /// kept before it. `same` is called as `same(kept, candidate)`. Returns the
    /// number of erased elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let mut list = List::from([10, 11, 13, 20, 21, 30]);
    /// assert_eq!(list.unique_by(|kept, x| x / 10 == kept / 10), 3);
    /// assert_eq!(list, List::from([10, 20, 30]));
    /// ```
    pub fn unique_by<F>(&mut self, mut same: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        sift::sift(self, |kept, elt| match kept {
            Some(kept) => !same(kept, elt),
            None => true,
        })
    }

    /// Returns `true` if the `List` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    ///
    /// let list = List::from([0, 1, 2]);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Sort the list.
    ///
    /// This sort is stable (i.e., does not reorder equal elements). Elements are
    /// relinked, never moved, so cursors keep naming their elements.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(log(*n*))
    /// memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    /// let mut list = List::from([5, 3, 1, 4, 1, 5, 9, 2, 6]);
    ///
    /// list.sort();
    ///
    /// assert_eq!(list, List::from([1, 1, 2, 3, 4, 5, 5, 6, 9]));
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    /// Sort the list with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// elements in the list. If the ordering is not total, the order
    /// of the elements is unspecified, but no element is lost.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    /// let mut v = List::from([5, 4, 1, 3, 2]);
    /// v.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(v, List::from([1, 2, 3, 4, 5]));
    ///
    /// // reverse sorting
    /// v.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(v, List::from([5, 4, 3, 2, 1]));
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        sort::merge_sort(self, |a, b| compare(a, b) == Ordering::Less);
        self.check_invariants();
    }

    /// Sorts the list with a key extraction function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements)
    /// and *O*(*m* \* *n* \* log(*n*)) worst-case, where the
    /// key function is *O*(*m*).
    ///
    /// # Examples
    ///
    /// ```
    /// use ghost_list::List;
    /// let mut v = List::from([-5i32, 4, 1, -3, 2]);
    ///
    /// v.sort_by_key(|k| k.abs());
    /// assert_eq!(v, List::from([1, 2, -3, 4, -5]));
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        self.sort_by(|a, b| f(a).cmp(&f(b)))
    }
}

/// Move the nodes `front..=back` right before `pos`.
///
/// `pos` must not be inside `front..=back`.
unsafe fn relink_before<T>(front: NonNull<Node<T>>, back: NonNull<Node<T>>, pos: NonNull<Node<T>>) {
    connect(front.as_ref().prev, back.as_ref().next);
    connect(pos.as_ref().prev, front);
    connect(back, pos);
}

#[cfg(test)]
mod tests {
    use crate::alloc::Instrumented;
    use crate::List;
    use std::cell::Cell;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::rc::Rc;

    /// A value counting how many times it has been cloned.
    #[derive(Debug)]
    struct Tracked {
        value: i32,
        clones: Rc<Cell<usize>>,
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Self {
                value: self.value,
                clones: Rc::clone(&self.clones),
            }
        }
    }

    fn tracked(values: &[i32], clones: &Rc<Cell<usize>>) -> List<Tracked> {
        let tracked = values.iter().map(|&value| Tracked {
            value,
            clones: Rc::clone(clones),
        });
        List::try_from_iter(tracked).unwrap()
    }

    fn values(list: &List<Tracked>) -> Vec<i32> {
        list.iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_clone_is_independent() {
        let list = List::from([1, 2, 3]);
        let mut copy = list.clone();
        assert_eq!(copy, list);
        *copy.front_mut().unwrap() = 10;
        copy.push_back(4).unwrap();
        assert_eq!(list, List::from([1, 2, 3]));
        assert_eq!(copy, List::from([10, 2, 3, 4]));
    }

    #[test]
    fn test_clone_from_reuses_nodes() {
        let alloc = Instrumented::new();
        let mut target = List::try_from_iter_in(0..5, alloc.clone()).unwrap();
        let source = List::try_from_iter_in(10..13, alloc.clone()).unwrap();
        let before = alloc.stats();

        target.clone_from(&source);
        assert_eq!(target, List::from([10, 11, 12]));
        let after = alloc.stats();
        assert_eq!(after.node_allocs, before.node_allocs);
        assert_eq!(after.node_deallocs, before.node_deallocs + 2);

        let longer = List::try_from_iter_in(0..4, alloc.clone()).unwrap();
        target.clone_from(&longer);
        assert_eq!(target, List::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_move_copies_nothing() {
        let clones = Rc::new(Cell::new(0));
        let mut list = tracked(&[1, 2, 3], &clones);
        let moved = std::mem::take(&mut list);
        assert!(list.is_empty());
        assert_eq!(values(&moved), vec![1, 2, 3]);
        assert_eq!(clones.get(), 0);
    }

    #[test]
    fn test_swap() {
        let clones = Rc::new(Cell::new(0));
        let mut a = tracked(&[1, 2], &clones);
        let mut b = tracked(&[3, 4, 5], &clones);
        let two = a.last();
        let five = b.last();

        a.swap(&mut b);
        assert_eq!(values(&a), vec![3, 4, 5]);
        assert_eq!(values(&b), vec![1, 2]);
        assert_eq!((a.len(), b.len()), (3, 2));
        assert_eq!(clones.get(), 0);
        assert_eq!(b.get(two).map(|t| t.value), Ok(2));
        assert_eq!(a.get(five).map(|t| t.value), Ok(5));
    }

    #[test]
    fn test_assign_shrink_reuses_nodes() {
        let alloc = Instrumented::new();
        let mut list = List::try_from_iter_in(1..=5, alloc.clone()).unwrap();
        let before = alloc.stats();

        list.assign(3, &9).unwrap();
        assert_eq!(list, List::from([9, 9, 9]));
        let after = alloc.stats();
        assert_eq!(after.node_allocs, before.node_allocs);
        assert_eq!(after.value_allocs, before.value_allocs);
        assert_eq!(after.constructs, before.constructs);
        assert_eq!(after.node_deallocs, before.node_deallocs + 2);
        assert_eq!(after.destroys, before.destroys + 2);
    }

    #[test]
    fn test_assign_iter_grows_in_lockstep() {
        let alloc = Instrumented::new();
        let mut list = List::try_from_iter_in([1, 2], alloc.clone()).unwrap();
        let two = list.last();
        list.assign_iter((10..15).filter(|x| x % 2 == 0)).unwrap();
        assert_eq!(list, List::from([10, 12, 14]));
        assert_eq!(list.get(two), Ok(&12));
        assert_eq!(alloc.stats().node_allocs, 3);
    }

    #[test]
    fn test_resize() {
        let mut list = List::from([1, 2, 3]);
        let first = list.begin();
        list.resize(5, &7).unwrap();
        assert_eq!(list, List::from([1, 2, 3, 7, 7]));
        list.resize(2, &7).unwrap();
        assert_eq!(list, List::from([1, 2]));
        list.resize_default(3).unwrap();
        assert_eq!(list, List::from([1, 2, 0]));
        list.resize_default(0).unwrap();
        assert!(list.is_empty());
        assert!(list.get(first).is_err());
    }

    #[test]
    fn test_reverse() {
        let mut list = List::try_from_iter(0..6).unwrap();
        let cursors = [list.begin(), list.last()];
        list.reverse();
        assert_eq!(list, List::from([5, 4, 3, 2, 1, 0]));
        assert_eq!(list.last(), cursors[0]);
        assert_eq!(list.begin(), cursors[1]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
        list.reverse();
        assert_eq!(list, List::from([0, 1, 2, 3, 4, 5]));

        let mut empty = List::<i32>::new();
        empty.reverse();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_remove_family() {
        let mut list = List::from([1, 2, 3, 2, 4]);
        assert_eq!(list.remove(&2), 2);
        assert_eq!(list, List::from([1, 3, 4]));
        assert_eq!(list.remove(&7), 0);

        let mut list = List::from([1, 1, 2, 3, 3, 3, 1]);
        assert_eq!(list.unique(), 3);
        assert_eq!(list, List::from([1, 2, 3, 1]));
        assert_eq!(list.unique(), 0);

        let mut list = List::try_from_iter(0..10).unwrap();
        assert_eq!(list.remove_if(|x| x % 2 == 1), 5);
        assert_eq!(list, List::from([0, 2, 4, 6, 8]));
    }

    #[test]
    fn test_remove_keeps_other_cursors() {
        let mut list = List::from([1, 2, 1, 3]);
        let mut three = list.last();
        let mut two = list.begin();
        two.move_next(&list).unwrap();
        assert_eq!(list.remove(&1), 2);
        assert_eq!(list.get(two), Ok(&2));
        three.move_prev(&list).unwrap();
        assert_eq!(three, two);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut list = List::from([(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')]);
        list.sort_by_key(|&(key, _)| key);
        assert_eq!(
            list,
            List::from([(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')])
        );

        let mut list = List::from([5, 3, 1, 4, 1, 5, 9, 2, 6]);
        list.sort();
        assert_eq!(list, List::from([1, 1, 2, 3, 4, 5, 5, 6, 9]));
    }

    #[test]
    fn test_ordering_and_hash() {
        fn hash_of<T: Hash>(t: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            t.hash(&mut hasher);
            hasher.finish()
        }
        let a = List::from([1, 2, 3]);
        let b = List::from([1, 2, 4]);
        let c = List::from([1, 2]);
        assert!(a < b);
        assert!(c < a);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
        assert!(a.contains(&3));
        assert!(!c.contains(&3));
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use crate::List;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Clone, Debug)]
    enum Op {
        PushFront(u8),
        PushBack(u8),
        PopFront,
        PopBack,
        Insert(usize, u8),
        Erase(usize),
        Truncate(usize),
        Reverse,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => any::<u8>().prop_map(Op::PushFront),
            2 => any::<u8>().prop_map(Op::PushBack),
            1 => Just(Op::PopFront),
            1 => Just(Op::PopBack),
            2 => (any::<usize>(), any::<u8>()).prop_map(|(at, v)| Op::Insert(at, v)),
            1 => any::<usize>().prop_map(Op::Erase),
            1 => (0..16usize).prop_map(Op::Truncate),
            1 => Just(Op::Reverse),
        ]
    }

    fn cursor_at(list: &List<u8>, at: usize) -> crate::Cursor<u8> {
        let mut cursor = list.begin();
        for _ in 0..at {
            cursor.move_next(list).unwrap();
        }
        cursor
    }

    proptest! {
        #[test]
        fn behaves_like_vec_deque(ops in prop::collection::vec(op(), 0..200)) {
            let mut list = List::new();
            let mut model = VecDeque::new();
            for op in ops {
                match op {
                    Op::PushFront(v) => {
                        list.push_front(v).unwrap();
                        model.push_front(v);
                    }
                    Op::PushBack(v) => {
                        list.push_back(v).unwrap();
                        model.push_back(v);
                    }
                    Op::PopFront => {
                        prop_assert_eq!(list.pop_front(), model.pop_front());
                    }
                    Op::PopBack => {
                        prop_assert_eq!(list.pop_back(), model.pop_back());
                    }
                    Op::Insert(at, v) => {
                        let at = at % (model.len() + 1);
                        let cursor = cursor_at(&list, at);
                        list.insert(cursor, v).unwrap();
                        model.insert(at, v);
                    }
                    Op::Erase(at) => {
                        if !model.is_empty() {
                            let at = at % model.len();
                            let cursor = cursor_at(&list, at);
                            list.erase(cursor).unwrap();
                            model.remove(at);
                        }
                    }
                    Op::Truncate(len) => {
                        list.truncate(len);
                        model.truncate(len);
                    }
                    Op::Reverse => {
                        list.reverse();
                        model.make_contiguous().reverse();
                    }
                }
                prop_assert_eq!(list.len(), model.len());
                prop_assert!(list.iter().eq(model.iter()));
                prop_assert!(list.iter().rev().eq(model.iter().rev()));
            }
        }

        #[test]
        fn sort_matches_vec(mut input in prop::collection::vec(0u8..16, 0..100)) {
            let mut list: List<(u8, usize)> =
                input.iter().enumerate().map(|(i, &k)| (k, i)).collect();
            list.sort_by_key(|&(k, _)| k);
            let mut expected: Vec<(u8, usize)> =
                input.iter().enumerate().map(|(i, &k)| (k, i)).collect();
            expected.sort_by_key(|&(k, _)| k);
            prop_assert!(list.iter().eq(expected.iter()));

            let mut list: List<u8> = input.iter().copied().collect();
            list.sort_by(|a, b| b.cmp(a));
            input.sort_by(|a, b| b.cmp(a));
            prop_assert!(list.iter().eq(input.iter()));
        }

        #[test]
        fn remove_family_matches_vec(input in prop::collection::vec(0u8..4, 0..64), x in 0u8..4) {
            let mut list: List<u8> = input.iter().copied().collect();
            let mut expected = input.clone();
            expected.retain(|&e| e != x);
            prop_assert_eq!(list.remove(&x), input.len() - expected.len());
            prop_assert!(list.iter().eq(expected.iter()));

            let mut list: List<u8> = input.iter().copied().collect();
            let mut expected = input.clone();
            expected.dedup();
            prop_assert_eq!(list.unique(), input.len() - expected.len());
            prop_assert!(list.iter().eq(expected.iter()));
        }
    }
}
