//! Network Module
//!
//! Connections to the group service and the per-request futures they hand out.
//!
//! ## Architecture
//! - Caller threads write tagged request frames
//! - One reader thread per connection routes replies by tag
//! - Each request owns a one-shot `ResultFuture`

mod future;
mod connection;

pub use future::{Fulfiller, ResultFuture};
pub use connection::{Connection, TcpConnection};
