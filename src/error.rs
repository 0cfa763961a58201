use thiserror::Error;

/// The allocation strategy could not provide storage for a node or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("memory allocation failed")]
pub struct AllocError;

/// Errors reported by [`List`](crate::List) operations.
///
/// Apart from [`Error::Alloc`], every variant reports a broken precondition
/// (a cursor used in a place where it has no meaning). Such calls never
/// modify the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// The cursor names a node that has been erased.
    #[error("cursor does not name a live node of the list")]
    StaleCursor,

    /// The cursor is at the end (ghost) position, which holds no element.
    #[error("cursor is at the end of the list")]
    AtEnd,

    /// Advancing forward from the end position.
    #[error("cannot move a cursor past the end of the list")]
    PastEnd,

    /// Advancing backward from the first element.
    #[error("cannot move a cursor before the start of the list")]
    BeforeStart,

    /// `last` is not reachable from `first` without passing the end.
    #[error("cursors do not form a valid range")]
    InvalidRange,
}
