//! Process-wide engine installation
//!
//! Kept in its own binary: `initialize` is once-per-process.

use colseq::{initialize, ColseqError, Fetch, ReaderSession, Value};
use std::sync::Arc;

use test_helpers::*;

#[test]
fn test_initialize_is_explicit_and_idempotent() {
    let engine = three_column_engine("/table");

    initialize(engine.clone());
    // second call is a no-op, not an error
    initialize(Arc::new(colseq::MemoryEngine::new()));

    // sessions opened by path alone go through the first-installed engine
    let mut reader = ReaderSession::open("/table").unwrap();
    assert_eq!(reader.list_columns().unwrap(), vec!["a", "b", "c"]);

    let seq = reader.column("a").unwrap();
    assert_eq!(seq.first().unwrap(), Fetch::Value(Value::Int64(1)));
    seq.cursor().borrow_mut().close().unwrap();
    reader.close().unwrap();

    // a path the installed engine does not know is an open error
    assert!(matches!(
        ReaderSession::open("/missing"),
        Err(ColseqError::Open(_))
    ));
}
