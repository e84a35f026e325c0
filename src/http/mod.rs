//! HTTP protocol handling.
//!
//! Only a reduced HTTP/1.1 subset is spoken: the request line is parsed,
//! headers and body are passed through to the application untouched, and
//! every connection carries exactly one request and one response.
//!
//! # Architecture
//!
//! - **`connection`**: The worker unit, driving one connection through its state machine
//! - **`parser`**: Extracts method, path and version from the first line
//! - **`request`**: The parsed request line
//! - **`response`**: Response head and the per-request commit state machine
//! - **`writer`**: Serializes the response and puts it on the socket
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read, parse the request line
//!        └──────┬──────┘
//!               │ Request line parsed (malformed → close, no response)
//!               ▼
//!        ┌──────────────────┐
//!        │    Invoking      │ ← Application runs on the blocking pool
//!        └──────┬───────────┘
//!               │ Body drained (failure → only already-flushed bytes)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Single write of the whole response
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
