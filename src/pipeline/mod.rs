//! Pipeline entry points.
//!
//! - `run`: authenticate, fetch, clean, format and send (or preview)
//! - `run_digest`: the same flow over injected source and mailer

pub mod digest;
pub mod run;

pub use digest::{RunSummary, build_digest, compose_email, run_digest};
pub use run::{Outcome, run};
