//! Line decoding for the context window source file
//!
//! # Error Handling Strategy
//!
//! Decoding follows a **skip-and-count** approach:
//!
//! - **Individual line failures**: A line that is not valid JSON, or does not match the
//!   record shape, is logged with its line number and skipped. One bad line does not take
//!   down the index page.
//!
//! - **Catastrophic failure detection**: If 100 lines in a row fail, or more than 50% of
//!   the lines in a completed scan failed, the scan returns
//!   [`StoreError::MalformedSource`](crate::error::StoreError::MalformedSource).
//!
//! - **Typed boundary**: Records are decoded into typed structs here, so field access
//!   further in never sees an untyped value.

pub mod deserializers;
pub mod lines;

pub use lines::{LineTally, MAX_CONSECUTIVE_ERRORS, MAX_FAILURE_RATE};
