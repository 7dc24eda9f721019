//! Build script for trackalloc.
//!
//! Emits feature hints so misconfigured builds are easy to spot.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DEBUG");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PARKING_LOT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DIAGNOSTICS");

    let debug_enabled = env::var("CARGO_FEATURE_DEBUG").is_ok();
    let is_release = env::var("PROFILE").map(|p| p == "release").unwrap_or(false);

    if debug_enabled && is_release {
        emit_warning("'debug' feature (buffer poisoning) enabled in a release build");
        emit_note("this slows every release; disable it for production builds");
    }
}

fn emit_warning(msg: &str) {
    println!("cargo:warning=[trackalloc] {}", msg);
}

fn emit_note(msg: &str) {
    println!("cargo:warning=[trackalloc]    {}", msg);
}
