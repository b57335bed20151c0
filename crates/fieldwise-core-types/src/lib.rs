//! Core types shared across fieldwise crates
//!
//! This crate provides the canonical vocabulary used by the logging
//! facility and error reporting of the comparison engine and the CLI:
//!
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
