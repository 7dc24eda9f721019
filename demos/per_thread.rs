//! Per-thread registries with cross-thread release scheduling.
//!
//! Run with: cargo run --example per_thread

use std::thread;

use trackalloc::{with_local, Encoding};

fn main() {
    let (mailbox, handle) = with_local(|registry| {
        let handle = registry
            .substring(b"per-thread tracking", 1, 10, Encoding::Utf8)
            .expect("start in range");
        (registry.mailbox(), handle)
    });
    println!("main thread live: {}", with_local(|r| r.count()));

    // another thread cannot touch this thread's collection; it schedules
    // the release through the mailbox instead
    thread::spawn(move || mailbox.post(handle)).join().unwrap();

    let live = with_local(|registry| {
        registry.drain_mailbox();
        registry.count()
    });
    println!("main thread live after posted release: {}", live);

    // worker threads drain their own collections when they exit
    thread::spawn(|| {
        with_local(|registry| {
            registry.register(b"worker-owned").expect("registration");
            println!("worker live: {}", registry.count());
        });
    })
    .join()
    .unwrap();

    println!("main thread live at exit: {}", with_local(|r| r.count()));
}
