//! Schema-validated row-writing session

use crate::engine::installed_engine;
use crate::{ColseqError, NativeEngine, Result, Schema, Value, WriterHandle};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A caller-supplied row, keyed by column name
pub type Row = IndexMap<String, Value>;

/// An open write session bound to a declared schema
///
/// Every row is validated against the schema — exact key set first, then
/// per-column type compatibility — before anything reaches the native
/// engine, so a rejected row has no effect on the file. Rows appended
/// before a later failure stay appended; there is no rollback. Buffering
/// and paging are the engine's business; [`close`] flushes and releases
/// the writer handle.
///
/// [`close`]: WriterSession::close
pub struct WriterSession {
    engine: Arc<dyn NativeEngine>,
    handle: Option<WriterHandle>,
    schema: Schema,
    path: PathBuf,
    rows_written: u64,
}

impl std::fmt::Debug for WriterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSession")
            .field("handle", &self.handle)
            .field("schema", &self.schema)
            .field("path", &self.path)
            .field("rows_written", &self.rows_written)
            .finish_non_exhaustive()
    }
}

impl WriterSession {
    /// Open a writer at `path` with the process-wide engine installed by
    /// [`crate::initialize`]
    pub fn open<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Self> {
        Self::open_with(installed_engine()?, path, schema)
    }

    /// Open a writer at `path` with an explicit engine
    pub fn open_with<P: AsRef<Path>>(
        engine: Arc<dyn NativeEngine>,
        path: P,
        schema: Schema,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let handle = engine.open_writer(&path, &schema)?;
        debug!(path = %path.display(), handle = handle.raw(), columns = schema.len(),
               "opened writer session");
        Ok(Self {
            engine,
            handle: Some(handle),
            schema,
            path,
            rows_written: 0,
        })
    }

    fn handle(&self) -> Result<&WriterHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| ColseqError::closed("writer session"))
    }

    /// Validate `values` against the schema and append it
    ///
    /// The key set must match the schema exactly and every value must be
    /// compatible with its column's declared type; validation happens
    /// before any native call, so a rejected row never reaches the
    /// engine.
    pub fn write_row(&mut self, values: &Row) -> Result<()> {
        let handle = self.handle()?;

        for name in self.schema.names() {
            if !values.contains_key(name.as_ref()) {
                return Err(ColseqError::row_shape(format!(
                    "row is missing declared column `{}`",
                    name
                )));
            }
        }
        if values.len() != self.schema.len() {
            for key in values.keys() {
                if !self.schema.contains(key) {
                    return Err(ColseqError::row_shape(format!(
                        "row has undeclared column `{}`",
                        key
                    )));
                }
            }
        }

        for (name, decl) in self.schema.iter() {
            let value = &values[name.as_ref()];
            if !decl.accepts(value) {
                return Err(ColseqError::type_mismatch(format!(
                    "column `{}` declared {} but row holds {}",
                    name,
                    decl.value_type.type_name(),
                    value.type_name()
                )));
            }
        }

        let row: Vec<Value> = self
            .schema
            .names()
            .map(|name| values[name.as_ref()].clone())
            .collect();
        self.engine.write_row(handle, row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows and release the writer handle
    ///
    /// Exactly-once: a second close, like a `write_row` after close,
    /// fails with the closed-resource error. The handle is released even
    /// if the flush fails, so close is not retried.
    pub fn close(&mut self) -> Result<()> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| ColseqError::closed("writer session"))?;
        debug!(path = %self.path.display(), handle = handle.raw(), rows = self.rows_written,
               "closing writer session");
        self.engine.close_writer(handle)
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows accepted so far in this session
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}
