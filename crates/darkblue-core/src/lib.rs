//! darkblue-core — configuration documents and the answer-key evaluator.
//!
//! This crate defines the configuration document model, the pure evaluator
//! that turns a document into a scored answer key, and the storage and
//! configuration layers the command-line tool builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod readme;
pub mod report;
pub mod session;
pub mod statistics;
pub mod store;
pub mod traits;
