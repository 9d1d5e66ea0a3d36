//! Pull-based column cursor with single-slot lookahead

use crate::{ColseqError, ColumnHandle, Fetch, NativeEngine, Result};
use std::sync::Arc;
use tracing::trace;

/// Forward-only reader over one native column stream
///
/// Owns its [`ColumnHandle`] exclusively and caches at most one
/// realized-but-unconsumed record. Closing is explicit and exactly-once;
/// nothing releases the handle on drop. Once the engine reports end of
/// stream the cursor stays at [`Fetch::End`] without pulling again.
pub struct ColumnCursor {
    engine: Arc<dyn NativeEngine>,
    handle: Option<ColumnHandle>,
    slot: Option<Fetch>,
    consumed: u64,
}

impl ColumnCursor {
    pub fn new(engine: Arc<dyn NativeEngine>, handle: ColumnHandle) -> Self {
        Self {
            engine,
            handle: Some(handle),
            slot: None,
            consumed: 0,
        }
    }

    fn handle(&self) -> Result<&ColumnHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| ColseqError::closed("column cursor"))
    }

    /// Look at the next record without consuming it
    ///
    /// Pulls from the engine only when the lookahead slot is empty, so
    /// repeated peeks return the same record.
    pub fn peek(&mut self) -> Result<Fetch> {
        if let Some(cached) = &self.slot {
            return Ok(cached.clone());
        }
        let fetched = self.engine.column_next(self.handle()?)?;
        self.slot = Some(fetched.clone());
        Ok(fetched)
    }

    /// Take the next record, advancing the stream by one
    pub fn consume(&mut self) -> Result<Fetch> {
        let fetched = match self.slot.take() {
            Some(cached) => cached,
            None => self.engine.column_next(self.handle()?)?,
        };
        match fetched {
            Fetch::End => {
                // exhaustion is sticky
                self.slot = Some(Fetch::End);
                Ok(Fetch::End)
            }
            value => {
                self.consumed += 1;
                Ok(value)
            }
        }
    }

    /// Whether another record is available
    pub fn has_more(&mut self) -> Result<bool> {
        Ok(!self.peek()?.is_end())
    }

    /// Release the native column resource
    ///
    /// Exactly-once: a second close, like any other call after close,
    /// fails with the closed-resource error.
    pub fn close(&mut self) -> Result<()> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| ColseqError::closed("column cursor"))?;
        trace!(handle = handle.raw(), "closing column cursor");
        self.slot = None;
        self.engine.close_column(handle)
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Number of records handed out by `consume` so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}
