use colseq::{ColseqError, Fetch, MemoryEngine, ReaderSession, Value};
use std::sync::Arc;

use test_helpers::*;

#[test]
fn test_open_missing_path_fails() {
    let engine = Arc::new(MemoryEngine::new());
    let err = ReaderSession::open_with(engine, "/does/not/exist").unwrap_err();
    assert!(matches!(err, ColseqError::Open(_)));
}

#[test]
fn test_list_columns_in_declaration_order() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();

    assert_eq!(reader.list_columns().unwrap(), vec!["a", "b", "c"]);
    reader.close().unwrap();
}

#[test]
fn test_column_traversal_scenario() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();

    let seq = reader.column("a").unwrap();
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));
    let next = seq.rest();
    assert_eq!(next.first().unwrap(), Fetch::Value(Value::Int64(2)));
    assert_eq!(next.rest().first().unwrap(), Fetch::End);

    seq.cursor().borrow_mut().close().unwrap();
    reader.close().unwrap();
}

#[test]
fn test_unknown_column_fails() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();

    let err = reader.column("zip").unwrap_err();
    assert!(matches!(err, ColseqError::UnknownColumn(_)));
    assert!(err.to_string().contains("zip"));
    reader.close().unwrap();
}

#[test]
fn test_session_close_does_not_close_cursors() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();
    let seq = reader.column("b").unwrap();

    reader.close().unwrap();
    assert!(reader.is_closed());

    // the column outlives its reader and must be released separately
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::from("x")));
    assert!(!seq.cursor().borrow().is_closed());
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_operations_after_session_close_fail() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();
    reader.close().unwrap();

    assert!(matches!(reader.list_columns(), Err(ColseqError::Closed(_))));
    assert!(matches!(reader.column("a"), Err(ColseqError::Closed(_))));
    assert!(matches!(reader.close(), Err(ColseqError::Closed(_))));
}

#[test]
fn test_repeated_column_opens_are_independent() {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();

    let left = reader.column("a").unwrap();
    let right = reader.column("a").unwrap();

    // separate cursors replay the column; sibling nodes of one cursor
    // would not
    assert_eq!(left.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(right.first().unwrap(), Fetch::Value(Value::Int64(1)));

    left.cursor().borrow_mut().close().unwrap();
    right.cursor().borrow_mut().close().unwrap();
    reader.close().unwrap();
}
