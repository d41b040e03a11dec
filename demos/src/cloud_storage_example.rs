//! Example demonstrating object storage sources with term-shape.
//!
//! The object is downloaded into a temporary local copy, scanned, and the copy
//! is removed again. An in-memory store stands in for a bucket so the example
//! runs without credentials; with the `s3` feature and AWS credentials in the
//! environment, set `TERM_SHAPE_S3_URL` to scan a real object as well.
//!
//! Run with:
//! ```bash
//! cargo run --example cloud_storage_example --features cloud-storage
//! ```

use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use term_shape::prelude::*;
use term_shape::sources::{validate_source, ObjectStoreSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("term-shape Object Storage Example\n");

    let store = Arc::new(InMemory::new());
    store
        .put(
            &Path::from("landing/2024/orders.csv"),
            PutPayload::from_static(b"id,item,qty\n1,\"nut, bolt\",3\n2,washer\n"),
        )
        .await?;

    let source = ObjectStoreSource::with_store(
        "memory://landing/2024/orders.csv",
        store.clone(),
        "landing/2024/orders.csv",
    );

    // One call: download, scan, clean up
    println!("{}", source.validate(3).await?);

    // Or keep the local copy around while working with it
    let downloaded = source.download().await?;
    println!("local copy at {}", downloaded.path().display());
    let result = validate_source(&downloaded, 3)?;
    println!("{result}");
    drop(downloaded);

    #[cfg(feature = "s3")]
    {
        if let Ok(url) = std::env::var("TERM_SHAPE_S3_URL") {
            println!("\n=== S3 ===");
            let remote = ObjectStoreSource::from_url(&url)?;
            println!("{}", remote.validate(3).await?);
        }
    }

    Ok(())
}
