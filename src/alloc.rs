//! Allocation strategies for list nodes and the values they own.
//!
//! A [`List`](crate::List) asks its strategy for two kinds of storage, one at a time:
//! - a *node* holding the `next`/`prev` links and a pointer to the value;
//! - a *value slot* holding the element itself.
//!
//! The two requests are independent, so a strategy may, for instance, pool nodes
//! while leaving values to the platform allocator.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::error::AllocError;

/// A strategy that provides storage for list nodes and values.
///
/// # Safety
///
/// A block returned by `allocate_node` (resp. `allocate_value`) must be valid for
/// reads and writes of `layout.size()` bytes, aligned to `layout.align()`, and stay
/// valid until it is passed back to `deallocate_node` (resp. `deallocate_value`)
/// with the same layout. Clones of a strategy must be able to release each other's
/// blocks.
pub unsafe trait Allocator {
    /// Acquire storage for one node structure.
    fn allocate_node(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a node structure.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate_node` of this strategy (or a clone of it)
    /// called with the same `layout`.
    unsafe fn deallocate_node(&self, ptr: NonNull<u8>, layout: Layout);

    /// Acquire storage for one value.
    fn allocate_value(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a value slot. The value in it must already be destroyed.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate_value` of this strategy (or a clone of it)
    /// called with the same `layout`.
    unsafe fn deallocate_value(&self, ptr: NonNull<u8>, layout: Layout);

    /// Move `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live value slot of this strategy that holds no value.
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Drop the value at `ptr` in place, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live value slot of this strategy holding a value.
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        ptr.as_ptr().drop_in_place();
    }
}

/// The platform's general-purpose allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate_node(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        allocate_raw(layout)
    }

    #[inline]
    unsafe fn deallocate_node(&self, ptr: NonNull<u8>, layout: Layout) {
        deallocate_raw(ptr, layout)
    }

    #[inline]
    fn allocate_value(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        allocate_raw(layout)
    }

    #[inline]
    unsafe fn deallocate_value(&self, ptr: NonNull<u8>, layout: Layout) {
        deallocate_raw(ptr, layout)
    }
}

fn allocate_raw(layout: Layout) -> Result<NonNull<u8>, AllocError> {
    if layout.size() == 0 {
        // SAFETY: alignments are never zero.
        return Ok(unsafe { NonNull::new_unchecked(layout.align() as *mut u8) });
    }
    // SAFETY: `layout` has a non-zero size.
    NonNull::new(unsafe { std::alloc::alloc(layout) }).ok_or(AllocError)
}

unsafe fn deallocate_raw(ptr: NonNull<u8>, layout: Layout) {
    if layout.size() != 0 {
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

/// A snapshot of the counters kept by [`Instrumented`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocStats {
    pub node_allocs: usize,
    pub node_deallocs: usize,
    pub value_allocs: usize,
    pub value_deallocs: usize,
    pub constructs: usize,
    pub destroys: usize,
}

impl AllocStats {
    /// Nodes acquired and not yet released.
    pub fn live_nodes(&self) -> usize {
        self.node_allocs - self.node_deallocs
    }

    /// Value slots acquired and not yet released.
    pub fn live_values(&self) -> usize {
        self.value_allocs - self.value_deallocs
    }
}

#[derive(Default)]
struct Counters {
    node_allocs: Cell<usize>,
    node_deallocs: Cell<usize>,
    value_allocs: Cell<usize>,
    value_deallocs: Cell<usize>,
    constructs: Cell<usize>,
    destroys: Cell<usize>,
    /// Remaining successful allocations, `None` for unlimited.
    budget: Cell<Option<usize>>,
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

/// A strategy wrapping another one, counting every request made through it.
///
/// Clones share their counters, so a list and its clones report together.
/// It can also be told to fail after a number of successful allocations, to
/// exercise the failure paths of a list.
///
/// # Examples
///
/// ```
/// use ghost_list::alloc::Instrumented;
/// use ghost_list::List;
///
/// let alloc = Instrumented::new();
/// let mut list = List::new_in(alloc.clone());
/// list.push_back(1).unwrap();
/// list.push_back(2).unwrap();
///
/// let stats = alloc.stats();
/// assert_eq!(stats.node_allocs, 2);
/// assert_eq!(stats.value_allocs, 2);
///
/// alloc.fail_after(0);
/// assert!(list.push_back(3).is_err());
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Instrumented<A = Global> {
    inner: A,
    counters: Rc<Counters>,
}

impl Instrumented<Global> {
    /// Instrument the platform allocator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> Instrumented<A> {
    /// Instrument an arbitrary strategy.
    pub fn wrap(inner: A) -> Self {
        let counters = Rc::default();
        Self { inner, counters }
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> AllocStats {
        let c = &self.counters;
        AllocStats {
            node_allocs: c.node_allocs.get(),
            node_deallocs: c.node_deallocs.get(),
            value_allocs: c.value_allocs.get(),
            value_deallocs: c.value_deallocs.get(),
            constructs: c.constructs.get(),
            destroys: c.destroys.get(),
        }
    }

    /// Let the next `n` allocations (nodes and values together) succeed, and
    /// fail every one after them.
    pub fn fail_after(&self, n: usize) {
        self.counters.budget.set(Some(n));
    }

    /// Lift the limit set by [`Instrumented::fail_after`].
    pub fn never_fail(&self) {
        self.counters.budget.set(None);
    }

    fn charge(&self) -> Result<(), AllocError> {
        match self.counters.budget.get() {
            None => Ok(()),
            Some(0) => Err(AllocError),
            Some(n) => {
                self.counters.budget.set(Some(n - 1));
                Ok(())
            }
        }
    }
}

impl<A> fmt::Debug for Instrumented<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instrumented").field(&self.stats()).finish()
    }
}

unsafe impl<A: Allocator> Allocator for Instrumented<A> {
    fn allocate_node(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.charge()?;
        let ptr = self.inner.allocate_node(layout)?;
        bump(&self.counters.node_allocs);
        Ok(ptr)
    }

    unsafe fn deallocate_node(&self, ptr: NonNull<u8>, layout: Layout) {
        bump(&self.counters.node_deallocs);
        self.inner.deallocate_node(ptr, layout)
    }

    fn allocate_value(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.charge()?;
        let ptr = self.inner.allocate_value(layout)?;
        bump(&self.counters.value_allocs);
        Ok(ptr)
    }

    unsafe fn deallocate_value(&self, ptr: NonNull<u8>, layout: Layout) {
        bump(&self.counters.value_deallocs);
        self.inner.deallocate_value(ptr, layout)
    }

    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        bump(&self.counters.constructs);
        self.inner.construct(ptr, value)
    }

    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        bump(&self.counters.destroys);
        self.inner.destroy(ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_round_trip() {
        let layout = Layout::new::<u64>();
        let ptr = Global.allocate_value(layout).unwrap().cast::<u64>();
        unsafe {
            Global.construct(ptr, 42);
            assert_eq!(*ptr.as_ref(), 42);
            Global.destroy(ptr);
            Global.deallocate_value(ptr.cast(), layout);
        }
    }

    #[test]
    fn global_zero_sized() {
        let layout = Layout::new::<()>();
        let ptr = Global.allocate_value(layout).unwrap();
        unsafe { Global.deallocate_value(ptr, layout) };
    }

    #[test]
    fn instrumented_counts_and_fails() {
        let alloc = Instrumented::new();
        let clone = alloc.clone();
        let layout = Layout::new::<u32>();

        let node = clone.allocate_node(layout).unwrap();
        let value = alloc.allocate_value(layout).unwrap();
        let stats = alloc.stats();
        assert_eq!(stats.node_allocs, 1);
        assert_eq!(stats.value_allocs, 1);
        assert_eq!(stats.live_nodes(), 1);

        alloc.fail_after(1);
        let extra = alloc.allocate_value(layout).unwrap();
        assert_eq!(alloc.allocate_node(layout), Err(AllocError));
        assert_eq!(alloc.allocate_value(layout), Err(AllocError));
        alloc.never_fail();

        unsafe {
            alloc.deallocate_node(node, layout);
            alloc.deallocate_value(value, layout);
            alloc.deallocate_value(extra, layout);
        }
        let stats = clone.stats();
        assert_eq!(stats.live_nodes(), 0);
        assert_eq!(stats.live_values(), 0);
        assert_eq!(stats.value_allocs, 2);
    }
}
