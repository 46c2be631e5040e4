//! Shared helpers for socket-bound unit tests.

pub mod raw_server;
pub mod socket_guard;
