//! End-to-end flows of the core services against in-memory tools.

pub mod support;

#[cfg(test)]
mod reconnect;
