//! # moodring-realtime
//!
//! The realtime layer: WebSocket connection handles and pool, broadcast
//! rooms keyed by session code, the connection-to-participant binding
//! table, wire event types, and the gateway that routes inbound events
//! into the session store and fans the results back out.

pub mod connection;
pub mod gateway;
pub mod message;
pub mod room;

pub use connection::handle::ConnectionHandle;
pub use connection::pool::ConnectionPool;
pub use gateway::Gateway;
pub use message::{ClientEvent, ServerEvent};
pub use room::RoomRegistry;
