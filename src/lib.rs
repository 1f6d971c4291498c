//! rangeserve - static file server over raw HTTP/1.1
//!
//! Core library for request parsing, keep-alive connections and byte-range responses.

pub mod config;
pub mod fs;
pub mod http;
pub mod server;
