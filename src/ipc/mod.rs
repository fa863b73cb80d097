//! IPC listener that accepts events over a Unix socket.
//!
//! An external input tap (or a script) connects to the socket and sends
//! newline-delimited JSON events; key events are answered with whether the
//! tap should swallow them.

pub mod listener;
