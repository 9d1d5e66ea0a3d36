use colseq::{Fetch, LazySequence, Metadata, ReaderSession, Value};
use std::rc::Rc;
use std::sync::Arc;

use test_helpers::*;

fn open_column(name: &str) -> LazySequence {
    let engine = three_column_engine("/table");
    let mut reader = ReaderSession::open_with(engine, "/table").unwrap();
    let seq = reader.column(name).unwrap();
    reader.close().unwrap();
    seq
}

#[test]
fn test_first_memoizes() {
    let seq = open_column("a");

    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));

    // three firsts on one node advanced the shared cursor exactly once
    assert_eq!(seq.cursor().borrow().consumed(), 1);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_rest_is_lazy() {
    let seq = open_column("a");

    let tail = seq.rest();
    assert_eq!(seq.cursor().borrow().consumed(), 0);

    // realization order follows first() calls, not node construction
    assert_eq!(tail.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(2)));
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_traversal_ends_with_terminal_marker() {
    let seq = open_column("b");

    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::from("x")));
    let second = seq.rest();
    assert_eq!(second.first().unwrap(), Fetch::Value(Value::from("y")));
    let third = second.rest();
    assert_eq!(third.first().unwrap(), Fetch::End);
    assert_eq!(third.rest().first().unwrap(), Fetch::End);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_clones_share_realization() {
    let seq = open_column("a");
    let alias = seq.clone();

    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(alias.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.cursor().borrow().consumed(), 1);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_sibling_nodes_interleave_one_stream() {
    let seq = open_column("a");

    // two callers each hold a "branch" from the same node
    let branch_one = seq.rest();
    let branch_two = seq.rest();

    seq.first().unwrap();
    // both branches pull from the shared stream: one gets the second
    // element, the other finds the column exhausted
    assert_eq!(branch_one.first().unwrap(), Fetch::Value(Value::Int64(2)));
    assert_eq!(branch_two.first().unwrap(), Fetch::End);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_with_metadata_replaces_mapping() {
    let seq = open_column("a");

    let mut meta = Metadata::new();
    meta.insert(Arc::from("source"), Value::from("/table"));
    let meta = Rc::new(meta);

    let tagged = seq.with_metadata(Rc::clone(&meta));
    assert!(Rc::ptr_eq(&tagged.metadata(), &meta));
    assert!(seq.metadata().is_empty());
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_with_metadata_identity_short_circuit() {
    let seq = open_column("a");

    let same = seq.with_metadata(seq.metadata());
    // same metadata by identity: no new node
    assert!(Rc::ptr_eq(&same.metadata(), &seq.metadata()));
    seq.first().unwrap();
    assert_eq!(same.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.cursor().borrow().consumed(), 1);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_with_metadata_preserves_realization() {
    let seq = open_column("a");
    seq.first().unwrap();

    let tagged = seq.with_metadata(Rc::new(Metadata::new()));
    assert_eq!(tagged.first().unwrap(), Fetch::Value(Value::Int64(1)));
    assert_eq!(seq.cursor().borrow().consumed(), 1);
    seq.cursor().borrow_mut().close().unwrap();
}

#[test]
fn test_iterator_adapter() {
    let seq = open_column("c");

    let values: Vec<Value> = seq.iter().map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![Value::Boolean(true), Value::Boolean(false)]);
    seq.cursor().borrow_mut().close().unwrap();
}
