use crate::alloc::Allocator;
use crate::list::algorithms::relink_before;
use crate::list::{List, Node};
use std::ptr::NonNull;

const INSERTION_SORT_THRESHOLD: usize = 8;

/// Stable merge sort by relinking nodes. Values never move, so every cursor
/// keeps naming the same element.
pub(crate) fn merge_sort<T, A, F>(list: &mut List<T, A>, less: F)
where
    A: Allocator,
    F: FnMut(&T, &T) -> bool,
{
    if list.len() < 2 {
        return;
    }
    let mut sorter = Sorter { less };
    let (first, last) = (list.front_node(), list.ghost_node());
    // SAFETY: `front..ghost` is the whole list, and holds at least 2 nodes.
    unsafe {
        if list.len() <= INSERTION_SORT_THRESHOLD {
            sorter.insertion_sort(first, last);
        } else {
            sorter.sort_range(first, last);
        }
    }
}

struct Sorter<F> {
    less: F,
}

impl<F> Sorter<F> {
    /// `*a < *b`, both must be non-ghost nodes.
    unsafe fn precedes<T>(&mut self, a: NonNull<Node<T>>, b: NonNull<Node<T>>) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        (self.less)(Node::element(a), Node::element(b))
    }

    /// Sort `first..last` and return its new first node.
    unsafe fn sort_range<T>(
        &mut self,
        mut first: NonNull<Node<T>>,
        last: NonNull<Node<T>>,
    ) -> NonNull<Node<T>>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let (mut mid, len) = split_range(first, last);
        if len <= INSERTION_SORT_THRESHOLD {
            return self.insertion_sort(first, last);
        }
        first = self.sort_range(first, mid);
        mid = self.sort_range(mid, last);
        self.merge(first, mid, last)
    }

    /// Merge the sorted runs `first..mid` and `mid..last`, and return the new
    /// first node.
    ///
    /// Runs of the right half are moved, one run at a time, in front of the
    /// first node of the left half they strictly precede.
    unsafe fn merge<T>(
        &mut self,
        mut first: NonNull<Node<T>>,
        mid: NonNull<Node<T>>,
        last: NonNull<Node<T>>,
    ) -> NonNull<Node<T>>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let left_back = mid.as_ref().prev;
        let (mut left, mut right) = (first, mid);
        // once `*right >= *left_back`, the rest is in order
        while right != last && self.precedes(right, left_back) {
            while left != right && !self.precedes(right, left) {
                left = left.as_ref().next;
            }
            if left == right {
                break;
            }
            let mut run_end = right.as_ref().next;
            while run_end != last && self.precedes(run_end, left) {
                run_end = run_end.as_ref().next;
            }
            if left == first {
                first = right;
            }
            relink_before(right, run_end.as_ref().prev, left);
            right = run_end;
        }
        first
    }

    /// Insertion sort of `first..last`, returning the new first node.
    unsafe fn insertion_sort<T>(
        &mut self,
        mut first: NonNull<Node<T>>,
        last: NonNull<Node<T>>,
    ) -> NonNull<Node<T>>
    where
        F: FnMut(&T, &T) -> bool,
    {
        if first == last {
            return first;
        }
        let (mut sorted_back, mut next) = (first, first.as_ref().next);
        loop {
            while next != last && !self.precedes(next, sorted_back) {
                sorted_back = next;
                next = next.as_ref().next;
            }
            if next == last {
                return first;
            }
            let mut pos = first;
            while pos != next && !self.precedes(next, pos) {
                pos = pos.as_ref().next;
            }
            let node = next;
            next = node.as_ref().next;
            if pos == node {
                // inconsistent comparator, leave it in place
                sorted_back = node;
                continue;
            }
            if pos == first {
                first = node;
            }
            relink_before(node, node, pos);
        }
    }
}

/// Returns the middle node of `first..last` and the length of the range.
unsafe fn split_range<T>(
    mut first: NonNull<Node<T>>,
    last: NonNull<Node<T>>,
) -> (NonNull<Node<T>>, usize) {
    let mut mid = first;
    let mut len = 0;
    while first != last {
        len += 1;
        first = first.as_ref().next;
        if first != last {
            len += 1;
            first = first.as_ref().next;
            mid = mid.as_ref().next;
        }
    }
    (mid, len)
}

#[cfg(test)]
mod tests {
    use crate::List;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Keyed {
        key: u8,
        seq: usize,
    }

    fn check_sorted(keys: &[u8]) {
        let mut list: List<Keyed> = keys
            .iter()
            .enumerate()
            .map(|(seq, &key)| Keyed { key, seq })
            .collect();
        let mut expected: Vec<Keyed> = list.iter().copied().collect();
        expected.sort_by_key(|k| k.key);
        list.sort_by_key(|k| k.key);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(list.iter().rev().count(), keys.len());
    }

    #[test]
    fn test_sort_small_and_large() {
        check_sorted(&[]);
        check_sorted(&[1]);
        check_sorted(&[2, 1]);
        check_sorted(&[3, 1, 2, 1, 3, 0, 2]);
        check_sorted(&[5, 4, 3, 2, 1, 0, 9, 8, 7]);
        let pseudo_random: Vec<u8> = (0..200u32).map(|i| (i * 7919 % 13) as u8).collect();
        check_sorted(&pseudo_random);
        let descending: Vec<u8> = (0..64).rev().collect();
        check_sorted(&descending);
        check_sorted(&[4; 33]);
    }

    #[test]
    fn test_sort_keeps_cursors() {
        let mut list: List<i32> = (0..20).map(|i| (i * 11) % 20).collect();
        let cursors: Vec<_> = {
            let mut cursors = Vec::new();
            let mut cursor = list.begin();
            while !cursor.is_end() {
                cursors.push(cursor);
                cursor.move_next(&list).unwrap();
            }
            cursors
        };
        let before: Vec<i32> = list.iter().copied().collect();
        list.sort();
        for (cursor, value) in cursors.iter().zip(before) {
            assert_eq!(list.get(*cursor), Ok(&value));
        }
        assert!(list.iter().zip(list.iter().skip(1)).all(|(a, b)| a <= b));
    }
}
