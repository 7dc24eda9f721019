//! SQL-style substring over UTF-8 and the legacy double-byte encoding.
//!
//! Run with: cargo run --example substring_extraction

use trackalloc::{Encoding, ResourceRegistry};

fn show(registry: &ResourceRegistry, handle: Option<trackalloc::Handle>, label: &str) {
    match handle.and_then(|h| registry.to_vec(h)) {
        Some(bytes) => println!("{}: [{}]", label, String::from_utf8_lossy(&bytes)),
        None => println!("{}: absent", label),
    }
}

fn main() {
    let registry = ResourceRegistry::with_defaults();

    let utf8 = "안녕하세요 Hello World!";
    let first = registry.substring(utf8.as_bytes(), 1, 5, Encoding::Utf8);
    show(&registry, first, "UTF-8 [1, 5]");

    let tail = registry.substring(utf8.as_bytes(), -6, 100, Encoding::Utf8);
    show(&registry, tail, "UTF-8 [-6, to end]");

    let absent = registry.substring(utf8.as_bytes(), 99, 5, Encoding::Utf8);
    show(&registry, absent, "UTF-8 [99, 5]");

    // double-byte text: every byte >= 0x80 consumes a trail byte
    let dbcs: &[u8] = &[0xBE, 0xC8, 0xB3, 0xE7, b' ', b'H', b'i'];
    let greeting = registry.substring(dbcs, 1, 2, Encoding::LegacyDbcs);
    match greeting.and_then(|h| registry.to_vec(h)) {
        Some(bytes) => println!("DBCS [1, 2]: {} bytes for 2 characters", bytes.len()),
        None => println!("DBCS [1, 2]: absent"),
    }
    let ascii = registry.substring(dbcs, 4, 2, Encoding::LegacyDbcs);
    show(&registry, ascii, "DBCS [4, 2]");

    println!("\ntracked: {}", registry.count());
    registry.cleanup_all();
    println!("tracked after cleanup: {}", registry.count());
}
