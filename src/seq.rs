//! Persistent, head-memoizing sequence view over a shared column cursor

use crate::{ColumnCursor, Fetch, Result, Value};
use indexmap::IndexMap;
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Metadata attached to a sequence node
pub type Metadata = IndexMap<Arc<str>, Value>;

/// Shared mutable cell behind every node derived from one entry point
pub type CursorCell = Rc<RefCell<ColumnCursor>>;

struct SeqNode {
    cursor: CursorCell,
    head: Rc<OnceCell<Fetch>>,
    meta: Rc<Metadata>,
}

/// Immutable, lazily-realized view over a column stream
///
/// Each node memoizes its head: the first call to [`first`] pulls exactly
/// one record from the shared cursor and every later call on the same
/// node returns that record without touching the cursor again. [`rest`]
/// allocates the next node without realizing anything.
///
/// # Aliasing
///
/// All nodes derived from one entry point are views over a single
/// forward-only stream, not independent iterators. Realizing heads from
/// two sibling nodes interleaves against that one stream, so each caller
/// silently misses the records the other consumed. Independent iteration
/// over the same column requires a second cursor from
/// [`crate::ReaderSession::column`].
///
/// Cloning a node is cheap and shares its realization state.
///
/// [`first`]: LazySequence::first
/// [`rest`]: LazySequence::rest
#[derive(Clone)]
pub struct LazySequence {
    inner: Rc<SeqNode>,
}

impl std::fmt::Debug for LazySequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySequence").finish_non_exhaustive()
    }
}

impl LazySequence {
    /// Entry point over a freshly opened cursor
    pub fn new(cursor: ColumnCursor) -> Self {
        Self::from_cell(Rc::new(RefCell::new(cursor)))
    }

    fn from_cell(cursor: CursorCell) -> Self {
        Self {
            inner: Rc::new(SeqNode {
                cursor,
                head: Rc::new(OnceCell::new()),
                meta: Rc::new(Metadata::new()),
            }),
        }
    }

    /// Realize and return this node's head
    ///
    /// The first invocation consumes exactly one record from the shared
    /// cursor and memoizes it; later invocations return the memoized
    /// record at no cost. Returns [`Fetch::End`] once the column is
    /// exhausted. Errors are not memoized, so a failed pull may be
    /// retried.
    pub fn first(&self) -> Result<Fetch> {
        if let Some(head) = self.inner.head.get() {
            return Ok(head.clone());
        }
        let fetched = self.inner.cursor.borrow_mut().consume()?;
        Ok(self.inner.head.get_or_init(|| fetched).clone())
    }

    /// The next node in the chain
    ///
    /// Pure allocation: the derived node shares this node's cursor and
    /// realizes its own head only when its `first` is eventually called.
    /// Metadata does not carry over.
    pub fn rest(&self) -> LazySequence {
        Self::from_cell(Rc::clone(&self.inner.cursor))
    }

    /// This node's metadata mapping
    pub fn metadata(&self) -> Rc<Metadata> {
        Rc::clone(&self.inner.meta)
    }

    /// A node with identical realization state but replaced metadata
    ///
    /// Compared by identity: passing the node's current metadata back in
    /// returns this very node, with no allocation.
    pub fn with_metadata(&self, meta: Rc<Metadata>) -> LazySequence {
        if Rc::ptr_eq(&self.inner.meta, &meta) {
            return self.clone();
        }
        LazySequence {
            inner: Rc::new(SeqNode {
                cursor: Rc::clone(&self.inner.cursor),
                head: Rc::clone(&self.inner.head),
                meta,
            }),
        }
    }

    /// The shared cursor cell, for explicit release
    ///
    /// The sequence never closes its cursor; callers that are done
    /// traversing must close it through this cell to free the native
    /// column resource.
    pub fn cursor(&self) -> CursorCell {
        Rc::clone(&self.inner.cursor)
    }

    /// Walk the chain as a fallible iterator over values
    ///
    /// Stops at the terminal marker; an error ends iteration after being
    /// yielded.
    pub fn iter(&self) -> SeqIter {
        SeqIter {
            node: Some(self.clone()),
        }
    }
}

/// Iterator adapter over a [`LazySequence`] chain
pub struct SeqIter {
    node: Option<LazySequence>,
}

impl Iterator for SeqIter {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node.take()?;
        match node.first() {
            Ok(Fetch::Value(value)) => {
                self.node = Some(node.rest());
                Some(Ok(value))
            }
            Ok(Fetch::End) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl IntoIterator for &LazySequence {
    type Item = Result<Value>;
    type IntoIter = SeqIter;

    fn into_iter(self) -> SeqIter {
        self.iter()
    }
}
