//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `musebox_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("musebox_core ping={}", musebox_core::ping());
    println!("musebox_core version={}", musebox_core::core_version());
}
