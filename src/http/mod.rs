//! HTTP protocol implementation.
//!
//! A GET-only HTTP/1.1 server with keep-alive connections and single byte-range
//! responses, written directly against the socket.
//!
//! # Architecture
//!
//! - **`connection`**: The per-socket state machine and request dispatch
//! - **`parser`**: Reads one request head off a buffered stream
//! - **`request`**: Request representation and the keep-alive decision
//! - **`range`**: `Range` header parsing and ranged reads
//! - **`response`**: Status codes and responses with a builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a request head (idle timeout applies)
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve resource, apply range
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → HalfClosing → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rangeserve::fs::FileResolver;
//! use rangeserve::http::connection::{Connection, ConnectionSettings};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = Arc::new(FileResolver::new("."));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = resolver.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, resolver, ConnectionSettings::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod range;
pub mod request;
pub mod response;
pub mod writer;
