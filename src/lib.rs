//! Consumers for JVM class-file visit events
//!
//! An external reader walks a class file and pushes one callback per
//! structural fact into a [`event::ClassConsumer`] chain. This crate supplies
//! the consumers that sit behind that contract:
//!
//!   - [`printer`] renders a disassembled listing,
//!   - [`emitter`] renders Rust source that replays the same events,
//!   - [`check`] validates event order and argument shape in front of any
//!     downstream consumer,
//!   - [`trace`] tees events into a printer while forwarding them unchanged.
//!
//! Rendering is deferred through the [`text::Text`] tree so that interleaved
//! member scopes still produce contiguous output. Everything is
//! single-threaded and fail-fast: the first bad event aborts the traversal
//! and whatever text had accumulated is discarded.

pub mod check;
pub mod driver;
pub mod emitter;
mod errors;
pub mod event;
pub mod opcodes;
pub mod printer;
pub mod signature;
pub mod text;
pub mod trace;

pub use errors::{Error, Result};
