//! Configure, build and test CMake projects from CI.
//!
//! Action inputs are read into a [`context::Context`], multi-value inputs
//! are split with shell quoting rules by [`parser`], and the resulting
//! argument vectors are handed to `cmake` and `ctest`.

pub mod action;
pub mod cmake;
pub mod context;
pub mod error;
pub mod exec;
pub mod inputs;
pub mod log;
pub mod output;
pub mod parser;

pub use error::{Error, Result, TokenizeError};
