//! `irq_rust` - Round-robin incremental reading queue
//!
//! This crate provides the `irq` CLI front end over [`irq_lib`]: queue
//! files live under a vault directory, one markdown (or JSON) document
//! per queue.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Vault settings (queue folder, active queue)
//! - [`format`] - Text output formatting
//! - [`logging`] - Tracing subscriber setup
//! - [`util`] - Block anchor helpers

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod util;

pub use cli::run;
