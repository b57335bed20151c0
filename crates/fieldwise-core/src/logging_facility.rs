//! Structured logging for comparisons and settings loading
//!
//! - `init(profile)` installs the subscriber once, writing to stderr
//! - `log_op_start!`, `log_op_end!` and `log_op_error!` emit the event
//!   fields named in `fieldwise_core_types::schema`
//! - `init_test_capture` records events so tests can assert on them
//!
//! ```rust
//! use fieldwise_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
