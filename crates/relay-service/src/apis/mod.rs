//! API handlers for the relay HTTP server.

pub mod cctp;
pub mod gasless;
pub mod health;
pub mod schema;
