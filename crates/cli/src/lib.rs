//! Command-line host for the secure temporary file rewrite.
//!
//! Reads compilation units exported as JSON, runs the configured rules
//! through [`engine::run`] and writes the rewritten units back out.

pub mod args;
pub mod config;
pub mod output;
pub mod rewrite;
pub mod rules;
pub mod ui;
