use std::ptr::NonNull;

use crate::error::AllocError;
use crate::list::Node;

/// A position in a list as seen from the outside: the index of a slot in the
/// [`Slots`] table, and the generation the slot had when the node was linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Handle {
    /// The ghost node. It is never stored in the table.
    pub(crate) const GHOST: Handle = Handle {
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) fn is_ghost(self) -> bool {
        self == Self::GHOST
    }
}

struct Entry<T> {
    node: Option<NonNull<Node<T>>>,
    generation: u32,
}

/// Table mapping handles to live nodes.
///
/// Releasing a slot bumps its generation, so handles to erased nodes stop
/// resolving even after the slot is reused.
///
/// `free` always has room for every entry, so releasing a slot never allocates.
pub(crate) struct Slots<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
}

impl<T> Slots<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Make sure the next [`Slots::insert`] will not allocate.
    pub(crate) fn reserve_one(&mut self) -> Result<(), AllocError> {
        if !self.free.is_empty() {
            return Ok(());
        }
        if self.entries.len() >= Handle::GHOST.index as usize {
            return Err(AllocError);
        }
        self.entries.try_reserve(1).map_err(|_| AllocError)?;
        self.free
            .try_reserve(self.entries.len() + 1)
            .map_err(|_| AllocError)?;
        Ok(())
    }

    /// Register `node` and return its slot index. Must follow a successful
    /// [`Slots::reserve_one`].
    pub(crate) fn insert(&mut self, node: NonNull<Node<T>>) -> u32 {
        match self.free.pop() {
            Some(index) => {
                self.entries[index as usize].node = Some(node);
                index
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    node: Some(node),
                    generation: 0,
                });
                index
            }
        }
    }

    pub(crate) fn release(&mut self, index: u32) {
        let entry = &mut self.entries[index as usize];
        debug_assert!(entry.node.is_some(), "releasing a free slot");
        entry.node = None;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<NonNull<Node<T>>> {
        let entry = self.entries.get(handle.index as usize)?;
        if entry.generation != handle.generation {
            return None;
        }
        entry.node
    }

    /// The current handle of the live slot `index`.
    pub(crate) fn handle(&self, index: u32) -> Handle {
        let generation = self.entries[index as usize].generation;
        Handle { index, generation }
    }

    /// Number of live slots.
    pub(crate) fn live(&self) -> usize {
        self.entries.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_reuse_bumps_generation() {
        let mut slots = Slots::<u8>::new();
        let node = NonNull::dangling();

        slots.reserve_one().unwrap();
        let index = slots.insert(node);
        let first = slots.handle(index);
        assert_eq!(slots.get(first), Some(node));
        assert_eq!(slots.live(), 1);

        slots.release(index);
        assert_eq!(slots.get(first), None);
        assert_eq!(slots.live(), 0);

        slots.reserve_one().unwrap();
        let reused = slots.insert(node);
        assert_eq!(reused, index);
        let second = slots.handle(reused);
        assert_ne!(first, second);
        assert_eq!(slots.get(first), None);
        assert_eq!(slots.get(second), Some(node));
    }

    #[test]
    fn slots_ghost_never_resolves() {
        let mut slots = Slots::<u8>::new();
        slots.reserve_one().unwrap();
        slots.insert(NonNull::dangling());
        assert!(Handle::GHOST.is_ghost());
        assert_eq!(slots.get(Handle::GHOST), None);
    }
}
