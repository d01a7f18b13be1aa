//! Toolkit engine CLI library.
//!
//! Command implementations and output formatting for the `toolkit-engine`
//! binary, exposed as a library so they can be tested without spawning a
//! process.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod commands;
pub mod formatters;
pub mod prompt;
