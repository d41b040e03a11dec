//! Example showing the scan over an arbitrary row stream.
//!
//! The validator pulls rows lazily and stops at the first row of the wrong
//! width, so it can gate an unbounded stream. Errors from the stream are
//! returned unchanged.

use std::cell::Cell;
use term_shape::core::{validate, RowShapeValidator};

#[derive(Debug)]
struct FeedError(&'static str);

fn main() {
    let pulled = Cell::new(0u64);

    // An endless feed where every millionth row is short
    let feed = (1u64..).map(|n| {
        pulled.set(n);
        if n % 1_000_000 == 0 {
            vec![n.to_string()]
        } else {
            vec![n.to_string(), "payload".to_string()]
        }
    });

    let result = RowShapeValidator::new("feed", 2).validate_rows(feed);
    println!("{result}");
    println!("rows pulled: {}", pulled.get());

    // A feed that breaks before any mismatch reports the break
    let broken = vec![
        Ok(vec!["a", "b"]),
        Err(FeedError("connection reset")),
        Ok(vec!["c"]),
    ];
    match validate(broken, "broken-feed", 2) {
        Ok(result) => println!("{result}"),
        Err(e) => println!("broken-feed could not be scanned: {}", e.0),
    }
}
