//! The native engine seam
//!
//! The engine that actually decodes and encodes the columnar file format
//! lives behind [`NativeEngine`]. Every call is blocking and synchronous;
//! the trait hands out opaque handle tokens that the session and cursor
//! types own and release explicitly. Nothing here finalizes a handle
//! automatically: a handle that is never passed back to its `close_*`
//! method leaks.

use crate::{ColseqError, Result, Schema, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

macro_rules! opaque_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// Deliberately not `Clone`: the wrapper that owns the handle is
        /// the only place it can be released from, and `close` consumes it.
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Mint a handle token. Only engine implementations call this.
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw identifier, for engine-side handle tables.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }
    };
}

opaque_handle!(
    /// Opaque token for an open file-level reader
    ReaderHandle
);
opaque_handle!(
    /// Opaque token for one native column stream
    ColumnHandle
);
opaque_handle!(
    /// Opaque token for an open schema-bound writer
    WriterHandle
);

/// Result of pulling one record from a column stream
///
/// A stored null arrives as `Fetch::Value(Value::Null)`; `Fetch::End`
/// means the stream is exhausted. The two are never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Value(Value),
    End,
}

impl Fetch {
    pub fn is_end(&self) -> bool {
        matches!(self, Fetch::End)
    }

    /// The pulled value, or `None` at end of stream
    pub fn into_value(self) -> Option<Value> {
        match self {
            Fetch::Value(v) => Some(v),
            Fetch::End => None,
        }
    }
}

/// Blocking, handle-based contract implemented by a columnar engine
///
/// All operations run to completion or failure on the calling thread;
/// there is no cancellation. Errors are surfaced to callers unmodified.
pub trait NativeEngine: Send + Sync {
    /// Open a file-level reader for `path`
    fn open_reader(&self, path: &Path) -> Result<ReaderHandle>;

    /// Release a reader handle. Column handles opened from it are not
    /// affected.
    fn close_reader(&self, handle: ReaderHandle) -> Result<()>;

    /// Ordered column names declared by the file's schema
    fn list_columns(&self, handle: &ReaderHandle) -> Result<Vec<String>>;

    /// Open a forward-only stream over one column
    fn open_column(&self, handle: &ReaderHandle, name: &str) -> Result<ColumnHandle>;

    /// Release a column handle
    fn close_column(&self, handle: ColumnHandle) -> Result<()>;

    /// Pull the next record from a column stream
    fn column_next(&self, handle: &ColumnHandle) -> Result<Fetch>;

    /// Open a writer bound to `schema` at `path`
    fn open_writer(&self, path: &Path, schema: &Schema) -> Result<WriterHandle>;

    /// Flush buffered rows and release a writer handle
    fn close_writer(&self, handle: WriterHandle) -> Result<()>;

    /// Append one row, given in schema declaration order. Validation
    /// happens in [`crate::WriterSession`] before this is called.
    fn write_row(&self, handle: &WriterHandle, row: Vec<Value>) -> Result<()>;
}

static ENGINE: OnceLock<Arc<dyn NativeEngine>> = OnceLock::new();

/// Install the process-wide native engine
///
/// Explicit and idempotent: the first call wins, later calls are no-ops.
/// Must be invoked before any session is opened through
/// [`crate::ReaderSession::open`] or [`crate::WriterSession::open`];
/// sessions opened with an explicit engine (`open_with`) do not need it.
pub fn initialize(engine: Arc<dyn NativeEngine>) {
    let _ = ENGINE.set(engine);
}

/// The installed process-wide engine, if any
pub(crate) fn installed_engine() -> Result<Arc<dyn NativeEngine>> {
    ENGINE
        .get()
        .cloned()
        .ok_or_else(|| ColseqError::engine("no native engine installed; call initialize() first"))
}
