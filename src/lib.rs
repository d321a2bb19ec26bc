//! gostack
//!
//! Parsing, coalescing and monitoring of Go goroutine stack dumps.
//!
//! This crate provides the core implementation for the
//! `gostack` CLI tool: a line-oriented dump parser, a grouping
//! engine that folds goroutines with identical stacks together,
//! and a time-series store that tracks group sizes across samples.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install gostack
//! gostack coalesce --source http://localhost:6060/debug/pprof/goroutine
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod source;
pub mod utils;
