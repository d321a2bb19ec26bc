//! Byte sources for goroutine dumps.
//!
//! A dump is read either from a local file or from a Go process's
//! `net/http/pprof` goroutine endpoint.

pub mod client;

pub use client::{full_dump_url, DumpClient, DumpSource};
