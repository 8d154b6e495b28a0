#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, file-drop parsing and the
//! terminal session guard.

pub mod drop;
pub mod event;
pub mod geometry;
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, info_span, trace, warn};
