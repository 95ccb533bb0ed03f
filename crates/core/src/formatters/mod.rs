//! Response formatting.
//!
//! Every HTTP response and every CLI run ends in an [`Envelope`]: a status,
//! a human-readable message, the payload, and a `meta` object that always
//! starts with the request timestamp.

pub mod envelope;
pub mod responses;

pub use envelope::{Envelope, Meta, Status, timestamp, to_json_string};
