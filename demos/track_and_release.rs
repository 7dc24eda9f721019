//! Register, resize, and release allocations through the process-wide
//! registry.
//!
//! Run with: cargo run --example track_and_release

use trackalloc::{global, shutdown, Encoding};

fn main() {
    let registry = global();
    let text = "안녕하세요 세상! Hello World!";

    let hangul = registry
        .substring(text.as_bytes(), 1, 2, Encoding::Utf8)
        .expect("start in range");
    let hello = registry
        .substring(text.as_bytes(), -12, 5, Encoding::Utf8)
        .expect("start in range");

    println!("tracked after extraction: {}", registry.count());

    // grow the second buffer and write into the zeroed tail
    let hello = registry.resize(hello, 8).expect("reallocation");
    registry
        .with_bytes_mut(hello, |bytes| {
            bytes[5..8].copy_from_slice(b"!!!");
        })
        .expect("handle is live");
    registry
        .with_bytes(hello, |bytes| {
            println!("after resize: {}", String::from_utf8_lossy(bytes));
        })
        .expect("handle is live");

    registry.release(hangul);
    println!("tracked after one release: {}", registry.count());

    println!("{}", registry.stats());

    shutdown();
    println!("tracked after shutdown: {}", registry.count());
}
