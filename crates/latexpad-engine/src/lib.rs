//! Editing core and background worker for latexpad.
//!
//! [`editing`] holds the line-based document model: positions and ranges,
//! deltas, anchors and change listeners. [`worker`] replays those deltas
//! into a debounced mirror that parses LaTeX with `latexpad-syntax`.

pub mod editing;
pub mod worker;

// Re-export key types for easier usage
pub use editing::{Anchor, Delta, Document, NewLineMode, Position, Range};
pub use worker::{Mirror, UpdateHook, WorkerRequest, WorkerResponse, spawn_latex_worker};
