//! Conduit - HTTP to application gateway
//!
//! Terminates TCP/HTTP connections, runs each one in its own worker unit,
//! and adapts it into a call of a synchronous application handler.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod server;
