//! File-level read session

use crate::engine::installed_engine;
use crate::{ColseqError, ColumnCursor, LazySequence, NativeEngine, ReaderHandle, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// An open read session over one columnar file
///
/// Mints one fresh cursor per [`column`] call. Closing the session
/// releases only the file-level reader handle: cursors already handed
/// out stay open and consumable, and each must be closed on its own.
/// That asymmetry is the contract, not an oversight — it lets a column
/// outlive its reader, and it means every cursor a caller obtains is a
/// separate leak risk until explicitly closed.
///
/// [`column`]: ReaderSession::column
pub struct ReaderSession {
    engine: Arc<dyn NativeEngine>,
    handle: Option<ReaderHandle>,
    path: PathBuf,
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("handle", &self.handle)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ReaderSession {
    /// Open `path` with the process-wide engine installed by
    /// [`crate::initialize`]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(installed_engine()?, path)
    }

    /// Open `path` with an explicit engine
    pub fn open_with<P: AsRef<Path>>(engine: Arc<dyn NativeEngine>, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let handle = engine.open_reader(&path)?;
        debug!(path = %path.display(), handle = handle.raw(), "opened reader session");
        Ok(Self {
            engine,
            handle: Some(handle),
            path,
        })
    }

    fn handle(&self) -> Result<&ReaderHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| ColseqError::closed("reader session"))
    }

    /// Ordered column names declared by the file's schema
    pub fn list_columns(&self) -> Result<Vec<String>> {
        self.engine.list_columns(self.handle()?)
    }

    /// Open a lazy sequence over one column
    ///
    /// Each call opens a fresh native cursor, so two calls with the same
    /// name yield independent streams. Fails with the unknown-column
    /// error if `name` is not declared.
    pub fn column(&self, name: &str) -> Result<LazySequence> {
        let handle = self.engine.open_column(self.handle()?, name)?;
        let cursor = ColumnCursor::new(Arc::clone(&self.engine), handle);
        Ok(LazySequence::new(cursor))
    }

    /// Release the reader handle
    ///
    /// Cursors obtained from this session are not closed. Exactly-once;
    /// a second close fails with the closed-resource error.
    pub fn close(&mut self) -> Result<()> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| ColseqError::closed("reader session"))?;
        debug!(path = %self.path.display(), handle = handle.raw(), "closing reader session");
        self.engine.close_reader(handle)
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
