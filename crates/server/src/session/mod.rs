//! Session multiplexing: one HTTP endpoint, many independent protocol
//! sessions, each bound to its own credential and engine.

pub mod adapter;
pub mod reaper;
pub mod registry;

pub use adapter::TransportAdapter;
pub use registry::{Session, SessionRegistry};
