use crate::alloc::Allocator;
use crate::list::algorithms::relink_before;
use crate::list::{List, Node};
use std::ptr::NonNull;

/// Erase every element `keep` rejects, in one forward pass, keeping the order
/// of the others. Returns the number of erased elements.
///
/// `keep` is given the last element kept so far (`None` at the start) and the
/// candidate.
///
/// Rejected nodes are first relinked, in one pass, to the back of the list,
/// and the whole tail starting at the first rejected node is erased at the
/// end. If `keep` panics, no element is lost, but the rejected ones so far
/// have been moved to the back.
pub(crate) fn sift<T, A, F>(list: &mut List<T, A>, mut keep: F) -> usize
where
    A: Allocator,
    F: FnMut(Option<&T>, &T) -> bool,
{
    let ghost = list.ghost_node();
    let mut node = list.front_node();
    let mut last_kept: Option<NonNull<Node<T>>> = None;
    let mut first_dropped: Option<NonNull<Node<T>>> = None;
    let mut dropped = 0;
    // SAFETY: every visited node lies in `front..ghost`, relinking only moves
    // nodes inside the list.
    unsafe {
        while node != ghost && Some(node) != first_dropped {
            let next = node.as_ref().next;
            let kept = keep(last_kept.map(|n| Node::element(n)), Node::element(node));
            if kept {
                last_kept = Some(node);
            } else {
                relink_before(node, node, ghost);
                first_dropped.get_or_insert(node);
                dropped += 1;
            }
            node = next;
        }
        if let Some(first) = first_dropped {
            list.erase_nodes(first, ghost);
        }
    }
    list.check_invariants();
    dropped
}

#[cfg(test)]
mod tests {
    use super::sift;
    use crate::List;

    fn sifted(input: &[i32], mut keep: impl FnMut(Option<&i32>, &i32) -> bool) -> (Vec<i32>, usize) {
        let mut list: List<i32> = input.iter().copied().collect();
        let dropped = sift(&mut list, &mut keep);
        (list.into_iter().collect(), dropped)
    }

    #[test]
    fn test_sift_filters_stably() {
        assert_eq!(sifted(&[], |_, _| false), (vec![], 0));
        assert_eq!(sifted(&[1, 2, 3], |_, _| true), (vec![1, 2, 3], 0));
        assert_eq!(sifted(&[1, 2, 3], |_, _| false), (vec![], 3));
        assert_eq!(
            sifted(&[1, 2, 3, 4, 5, 6], |_, &x| x % 2 == 0),
            (vec![2, 4, 6], 3)
        );
        assert_eq!(sifted(&[1, 2, 2, 3], |_, &x| x != 3), (vec![1, 2, 2], 1));
        assert_eq!(sifted(&[3, 3, 1], |_, &x| x != 3), (vec![1], 2));
    }

    #[test]
    fn test_sift_sees_last_kept() {
        let (kept, dropped) = sifted(&[1, 1, 2, 2, 2, 1, 3, 3], |last, x| last != Some(x));
        assert_eq!(kept, vec![1, 2, 1, 3]);
        assert_eq!(dropped, 4);
    }
}
