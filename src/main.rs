//! `irq_rust` (irq) - Round-robin incremental reading queue
//!
//! Keeps an ordered, persistent queue of notes and note blocks in a vault
//! directory, rotates through them, and remembers where you left off in
//! each. Non-invasive design: plain text files, no daemon, no database.

use irq_rust::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
