//! Lazy, resource-managed columnar sequences over a handle-based engine
//!
//! `colseq` bridges a blocking, handle-based columnar engine and a
//! persistent, head-memoizing lazy-sequence abstraction, and offers a
//! schema-validated row-writing path back to the same format. The engine
//! itself — decoding and encoding the on-disk columnar layout — stays
//! behind the [`NativeEngine`] trait; this crate owns the resource
//! lifetimes and the sequence semantics on top of it.
//!
//! # Key Components
//!
//! - **[`ReaderSession`]**: opens a file, lists its columns, and mints a
//!   [`LazySequence`] entry point (backed by a fresh [`ColumnCursor`])
//!   per column.
//! - **[`ColumnCursor`]**: forward-only pull cursor with a single-slot
//!   lookahead and exactly-once close.
//! - **[`LazySequence`]**: immutable, metadata-bearing chain of nodes
//!   that memoize their heads; sibling nodes alias one cursor, never
//!   copy it.
//! - **[`WriterSession`]**: validates rows against an ordered [`Schema`]
//!   before forwarding them to the engine; flushes on close.
//! - **[`MemoryEngine`]**: in-process engine implementation for tests
//!   and embedders.
//!
//! # Resource discipline
//!
//! Nothing here is finalized automatically. Cursors, readers, and
//! writers each hold one native handle and release it only through their
//! explicit `close`, exactly once; any use after close fails with
//! [`ColseqError::Closed`]. Closing a [`ReaderSession`] deliberately
//! does not close the cursors minted from it — a column may be consumed
//! after its reader is gone, and each open cursor is the caller's to
//! release.
//!
//! Everything is single-threaded and synchronous: engine calls block
//! until they return, and [`LazySequence`] is intentionally not `Send`.
//!
//! # Example
//!
//! ```
//! use colseq::{MemoryEngine, ReaderSession, Schema, Value, ValueType, WriterSession};
//! use std::sync::Arc;
//!
//! # fn main() -> colseq::Result<()> {
//! let engine = Arc::new(MemoryEngine::new());
//!
//! let schema = Schema::builder()
//!     .column("id", ValueType::Int64)
//!     .nullable_column("name", ValueType::String)
//!     .build()?;
//! let mut writer = WriterSession::open_with(engine.clone(), "/data/users", schema)?;
//! let mut row = colseq::Row::new();
//! row.insert("id".to_string(), Value::Int64(1));
//! row.insert("name".to_string(), Value::from("ada"));
//! writer.write_row(&row)?;
//! writer.close()?;
//!
//! let mut reader = ReaderSession::open_with(engine, "/data/users")?;
//! let ids = reader.column("id")?;
//! assert_eq!(ids.first()?.into_value(), Some(Value::Int64(1)));
//! reader.close()?;
//! ids.cursor().borrow_mut().close()?;
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod engine;
pub mod error;
pub mod memory;
pub mod reader;
pub mod schema;
pub mod seq;
pub mod value;
pub mod writer;

pub use cursor::ColumnCursor;
pub use engine::{
    initialize, ColumnHandle, Fetch, NativeEngine, ReaderHandle, WriterHandle,
};
pub use error::{ColseqError, Result};
pub use memory::MemoryEngine;
pub use reader::ReaderSession;
pub use schema::{ColumnDecl, Schema, SchemaBuilder, ValueType};
pub use seq::{CursorCell, LazySequence, Metadata, SeqIter};
pub use value::Value;
pub use writer::{Row, WriterSession};
