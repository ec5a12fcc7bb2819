//! Session domain module.
//!
//! This module contains the fill session state machine and the pieces it is
//! built from.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `state`: Lifecycle states (`SessionState`)
//! - `answer_store`: Collected answers (`AnswerStore`, `AnswerSnapshot`)
//! - `sequencer`: Picks the next placeholder to ask about
//! - `transcript`: Conversation record (`TranscriptLog`, `TranscriptEntry`)
//! - `controller`: Session lifecycle management (`SessionController`)
//!
//! # Usage
//!
//! ```ignore
//! use lexfill_core::session::{Session, SessionController, SessionState};
//! use lexfill_core::session::{AnswerSnapshot, TranscriptEntry, TranscriptRole};
//! ```

mod answer_store;
mod controller;
mod model;
pub mod sequencer;
mod state;
mod transcript;

#[cfg(test)]
mod controller_test;

// Re-export public API
pub use answer_store::{AnswerSnapshot, AnswerStore};
pub use controller::SessionController;
pub use model::Session;
pub use sequencer::NextPlaceholder;
pub use state::SessionState;
pub use transcript::{COMPLETION_MESSAGE, TranscriptEntry, TranscriptLog, TranscriptRole, render_plain};
