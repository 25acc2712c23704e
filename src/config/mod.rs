//! Configuration management for reconscan.
//!
//! Settings live in an XDG-compliant location and only supply defaults;
//! command-line flags override them per invocation.

mod settings;

pub use settings::{AppSettings, Paths};
