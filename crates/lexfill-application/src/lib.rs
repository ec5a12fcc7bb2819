//! Application layer for lexfill.
//!
//! This crate wires configuration to collaborators and exposes the fill use
//! cases consumed by the CLI.

pub mod fill_service;
pub mod session_factory;

pub use fill_service::{Answers, BatchOutcome, FillService, load_answers, parse_answers};
pub use session_factory::SessionFactory;
