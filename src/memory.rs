//! In-process reference engine
//!
//! `MemoryEngine` implements the full [`NativeEngine`] contract over
//! path-keyed in-memory tables. It exists for tests, examples, and
//! embedders that want the session and sequence machinery without a real
//! native library. Semantics mirror the contract: column streams are
//! snapshotted when opened (so they survive the reader's close), and
//! written rows become visible only when the writer is closed.

use crate::{
    ColseqError, ColumnHandle, Fetch, NativeEngine, ReaderHandle, Result, Schema, Value,
    WriterHandle,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

struct Table {
    schema: Schema,
    /// One vector per column, parallel to schema declaration order
    columns: Vec<Vec<Value>>,
}

struct PendingWrite {
    path: PathBuf,
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    files: HashMap<PathBuf, Table>,
    readers: HashMap<u64, PathBuf>,
    streams: HashMap<u64, VecDeque<Value>>,
    writers: HashMap<u64, PendingWrite>,
}

impl State {
    fn mint(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Path-keyed in-memory implementation of the native engine contract
#[derive(Default)]
pub struct MemoryEngine {
    state: Mutex<State>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| ColseqError::engine("engine state poisoned"))
    }

    /// Seed a table directly, bypassing the writer path
    ///
    /// Rows are given in schema order and validated against the schema.
    pub fn load_table<P: AsRef<Path>>(
        &self,
        path: P,
        schema: Schema,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let table = build_table(schema, rows)?;
        self.state()?
            .files
            .insert(path.as_ref().to_path_buf(), table);
        Ok(())
    }
}

fn reader_table<'a>(state: &'a State, handle: &ReaderHandle) -> Result<&'a Table> {
    let path = state
        .readers
        .get(&handle.raw())
        .ok_or_else(|| ColseqError::engine("unknown reader handle"))?;
    state
        .files
        .get(path)
        .ok_or_else(|| ColseqError::engine("backing table vanished"))
}

fn build_table(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Table> {
    let width = schema.len();
    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        if row.len() != width {
            return Err(ColseqError::engine(format!(
                "row has {} values but schema declares {} columns",
                row.len(),
                width
            )));
        }
        for ((decl, column), value) in schema
            .iter()
            .map(|(_, d)| d)
            .zip(columns.iter_mut())
            .zip(row)
        {
            if !decl.accepts(&value) {
                return Err(ColseqError::engine(format!(
                    "value of type {} not storable in {} column",
                    value.type_name(),
                    decl.value_type.type_name()
                )));
            }
            column.push(value);
        }
    }
    Ok(Table { schema, columns })
}

impl NativeEngine for MemoryEngine {
    fn open_reader(&self, path: &Path) -> Result<ReaderHandle> {
        let mut state = self.state()?;
        if !state.files.contains_key(path) {
            return Err(ColseqError::open(format!(
                "no such columnar file: {}",
                path.display()
            )));
        }
        let id = state.mint();
        state.readers.insert(id, path.to_path_buf());
        Ok(ReaderHandle::new(id))
    }

    fn close_reader(&self, handle: ReaderHandle) -> Result<()> {
        self.state()?
            .readers
            .remove(&handle.raw())
            .map(|_| ())
            .ok_or_else(|| ColseqError::engine("unknown reader handle"))
    }

    fn list_columns(&self, handle: &ReaderHandle) -> Result<Vec<String>> {
        let state = self.state()?;
        let table = reader_table(&state, handle)?;
        Ok(table.schema.names().map(|n| n.to_string()).collect())
    }

    fn open_column(&self, handle: &ReaderHandle, name: &str) -> Result<ColumnHandle> {
        let mut state = self.state()?;
        let snapshot = {
            let table = reader_table(&state, handle)?;
            let index = table
                .schema
                .names()
                .position(|n| n.as_ref() == name)
                .ok_or_else(|| ColseqError::unknown_column(name))?;
            // snapshot so the stream is independent of the reader's lifetime
            table.columns[index].iter().cloned().collect::<VecDeque<_>>()
        };
        let id = state.mint();
        state.streams.insert(id, snapshot);
        Ok(ColumnHandle::new(id))
    }

    fn close_column(&self, handle: ColumnHandle) -> Result<()> {
        self.state()?
            .streams
            .remove(&handle.raw())
            .map(|_| ())
            .ok_or_else(|| ColseqError::engine("unknown column handle"))
    }

    fn column_next(&self, handle: &ColumnHandle) -> Result<Fetch> {
        let mut state = self.state()?;
        let stream = state
            .streams
            .get_mut(&handle.raw())
            .ok_or_else(|| ColseqError::engine("unknown column handle"))?;
        Ok(match stream.pop_front() {
            Some(value) => Fetch::Value(value),
            None => Fetch::End,
        })
    }

    fn open_writer(&self, path: &Path, schema: &Schema) -> Result<WriterHandle> {
        if schema.is_empty() {
            return Err(ColseqError::schema(
                "writer schema must declare at least one column",
            ));
        }
        let mut state = self.state()?;
        let id = state.mint();
        state.writers.insert(
            id,
            PendingWrite {
                path: path.to_path_buf(),
                schema: schema.clone(),
                rows: Vec::new(),
            },
        );
        Ok(WriterHandle::new(id))
    }

    fn close_writer(&self, handle: WriterHandle) -> Result<()> {
        let mut state = self.state()?;
        let pending = state
            .writers
            .remove(&handle.raw())
            .ok_or_else(|| ColseqError::engine("unknown writer handle"))?;
        // flush on close: rows become visible only here
        let table = build_table(pending.schema, pending.rows)?;
        state.files.insert(pending.path, table);
        Ok(())
    }

    fn write_row(&self, handle: &WriterHandle, row: Vec<Value>) -> Result<()> {
        let mut state = self.state()?;
        let pending = state
            .writers
            .get_mut(&handle.raw())
            .ok_or_else(|| ColseqError::engine("unknown writer handle"))?;
        pending.rows.push(row);
        Ok(())
    }
}
